mod app_config;
mod http_client;
mod http_method;
mod info_routes;
mod proxy_service;
mod server;
mod std_logger;
#[cfg(test)]
mod test_logger;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use app_config::{AppConfig, CliArgs};
use clap::Parser;
use http_client::HttpClientConfig;
use log::{info, warn};
use proxy_service::proxy_config::ForwardConfig;
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
  let config = AppConfig::load(CliArgs::parse()).map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;

  std_logger::init(config.log_level)?;

  let http_client = HttpClientConfig {
    egress_proxy: config.egress_proxy.clone(),
    user: config.egress_proxy_user.clone(),
    pass: config.egress_proxy_pass.clone(),
  }
  .to_client()
  .map_err(|err| Error::new(ErrorKind::Other, err))?;

  let forward_config = Arc::new(ForwardConfig::from(&config));
  let cors_origins = config.cors_origins.clone();

  if config.allows_any_origin() {
    warn!("Cross-origin requests are allowed from any origin.");
  }

  info!(
    "Forwarding '{}/*' to '{}{}' with a {:?} timeout.",
    forward_config.mount, forward_config.upstream_base, forward_config.upstream_prefix, forward_config.timeout
  );

  HttpServer::new(move || {
    App::new()
      .wrap(server::build_cors(&cors_origins))
      .wrap(Logger::default())
      .configure(|cfg| server::configure_routes(cfg, forward_config.clone(), http_client.clone()))
  })
  .workers(config.workers)
  .bind((config.bind.as_str(), config.port))?
  .run()
  .await
}
