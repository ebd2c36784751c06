use crate::proxy_service::proxy_config::ForwardConfig;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct HealthStatus<'a> {
  status: &'static str,
  proxy: &'static str,
  target: &'a str,
}

#[derive(Serialize, Debug)]
struct ServiceInfo<'a> {
  message: &'static str,
  target: &'a str,
}

pub async fn health(config: web::Data<ForwardConfig>) -> impl Responder {
  HttpResponse::Ok().json(HealthStatus {
    status: "healthy",
    proxy: "active",
    target: &config.upstream_base,
  })
}

pub async fn root(config: web::Data<ForwardConfig>) -> impl Responder {
  HttpResponse::Ok().json(ServiceInfo {
    message: "API Proxy",
    target: &config.upstream_base,
  })
}
