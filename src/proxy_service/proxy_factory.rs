use crate::proxy_service::proxy_config::ForwardConfig;
use crate::proxy_service::proxy_route_service::ProxyRouteService;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use futures_core::future::LocalBoxFuture;
use log::debug;
use reqwest::Client;
use std::future::ready;
use std::sync::Arc;

/// Hands each worker a forwarding service. Every service shares the same
/// immutable config and the same connection pool.
pub struct ProxyRouteServiceFactory {
  config: Arc<ForwardConfig>,
  http_client: Client,
}

impl ProxyRouteServiceFactory {
  pub fn create(http_client: Client, forward_config: Arc<ForwardConfig>) -> Self {
    Self {
      config: forward_config,
      http_client,
    }
  }
}

impl ServiceFactory<ServiceRequest> for ProxyRouteServiceFactory {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Config = ();
  type Service = ProxyRouteService;
  type InitError = ();
  type Future = LocalBoxFuture<'static, Result<Self::Service, Self::InitError>>;

  fn new_service(&self, _: Self::Config) -> Self::Future {
    debug!(
      "Starting forwarding service for '{}' -> '{}{}'",
      self.config.mount, self.config.upstream_base, self.config.upstream_prefix
    );

    Box::pin(ready(Ok(ProxyRouteService {
      config: Arc::clone(&self.config),
      http_client: self.http_client.clone(),
    })))
  }
}
