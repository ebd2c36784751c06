use crate::info_routes;
use crate::proxy_service::proxy_config::ForwardConfig;
use crate::proxy_service::proxy_factory::ProxyRouteServiceFactory;
use actix_cors::Cors;
use actix_web::web;
use log::info;
use reqwest::Client;
use std::sync::Arc;

/// Side endpoints go first so an empty mount prefix cannot shadow them.
pub fn configure_routes(cfg: &mut web::ServiceConfig, forward_config: Arc<ForwardConfig>, http_client: Client) {
  let mount = forward_config.mount.to_string();
  let factory = ProxyRouteServiceFactory::create(http_client, forward_config.clone());

  cfg
    .app_data(web::Data::from(forward_config))
    .route("/health", web::get().to(info_routes::health))
    .route("/", web::get().to(info_routes::root))
    .service(web::scope(&mount).default_service(factory));
}

pub fn build_cors(origins: &[String]) -> Cors {
  let cors = Cors::default()
    .allow_any_method()
    .allow_any_header()
    .supports_credentials()
    .max_age(3600);

  if origins.iter().any(|origin| origin == "*") {
    return cors.allow_any_origin();
  }

  origins.iter().fold(cors, |cors, origin| {
    info!("Allowing cross-origin requests from '{}'.", origin);
    cors.allowed_origin(origin)
  })
}
