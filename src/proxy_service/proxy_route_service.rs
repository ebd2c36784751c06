use crate::http_method::HttpMethod;
use crate::proxy_service::forward_error::ForwardError;
use crate::proxy_service::proxy_config::{has_dot_segment, ForwardConfig};
use crate::proxy_service::{forwarded_headers, relayed_headers, DEFAULT_CONTENT_TYPE};
use actix_web::body::BoxBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse};
use actix_web::error::PayloadError;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{dev, HttpRequest, HttpResponse, ResponseError};
use bytes::{Bytes, BytesMut};
use futures_core::future::LocalBoxFuture;
use futures_util::StreamExt;
use log::{debug, error, warn};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

pub struct ProxyRouteService {
  pub(super) config: Arc<ForwardConfig>,
  pub(super) http_client: Client,
}

impl Service<ServiceRequest> for ProxyRouteService {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  dev::always_ready!();

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let (http_request, payload) = req.into_parts();
    let config = self.config.clone();
    let http_client = self.http_client.clone();

    // Dropping this future (caller went away) also drops the upstream call.
    Box::pin(async move {
      let response = ProxyRouteService::forward(&config, &http_client, &http_request, payload).await;
      Ok(ServiceResponse::new(http_request, response))
    })
  }
}

impl ProxyRouteService {
  /// Always resolves to a response; upstream failures become JSON error bodies.
  async fn forward(config: &ForwardConfig, http_client: &Client, http: &HttpRequest, payload: Payload) -> HttpResponse {
    let method = match HttpMethod::try_from(http.method()) {
      Ok(method) => method,
      Err(_) => {
        warn!("Method {} is not forwarded, rejecting {}", http.method(), http.path());
        return HttpResponse::MethodNotAllowed().finish();
      }
    };

    let path_suffix = config.path_suffix(http.path());
    if has_dot_segment(path_suffix) {
      warn!("Rejecting {} {}: dot segments are not forwarded", method, http.path());
      return ForwardError::DotSegment.error_response();
    }

    let target = config.target_url(path_suffix, http.query_string());

    match ProxyRouteService::exec(http_client, method, &target, http, payload, config.timeout).await {
      Ok(response) => response,
      Err(err) => {
        match &err {
          ForwardError::Timeout => error!("Timeout forwarding {} {} after {:?}", method, target, config.timeout),
          _ => error!("Forwarding {} {} failed: {}", method, target, err),
        }

        if config.redact_errors {
          err.redacted_response()
        } else {
          err.error_response()
        }
      }
    }
  }

  async fn exec(
    http_client: &Client,
    method: HttpMethod,
    target: &str,
    http: &HttpRequest,
    payload: Payload,
    timeout: Duration,
  ) -> Result<HttpResponse, ForwardError> {
    let mut builder = http_client
      .request(method.into(), target)
      .headers(forwarded_headers(http.headers()))
      .timeout(timeout);

    if method.carries_body() {
      let body = read_payload(payload).await?;
      builder = builder.body(body);
    }

    let proxy_response = builder.send().await?;

    debug!("Upstream answered {} {} with {}", method, target, proxy_response.status());

    let response = ProxyRouteService::map_response_head(&proxy_response);
    let body = proxy_response.bytes().await?;

    Ok(response.set_body(BoxBody::new(body)))
  }

  fn map_response_head(response: &Response) -> HttpResponse {
    let mut http_response = HttpResponse::new(response.status());
    let headers = http_response.headers_mut();

    for (name, value) in relayed_headers(response.headers()) {
      headers.append(name.clone(), value.clone());
    }

    if !headers.contains_key(header::CONTENT_TYPE) {
      headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    http_response
  }
}

async fn read_payload(mut payload: Payload) -> Result<Bytes, PayloadError> {
  let mut body_buffer = BytesMut::new();

  while let Some(chunk) = payload.next().await {
    body_buffer.extend_from_slice(&chunk?);
  }

  Ok(body_buffer.freeze())
}
