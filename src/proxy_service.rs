use crate::app_config::AppConfig;
use crate::proxy_service::proxy_config::ForwardConfig;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

pub mod forward_error;
pub mod proxy_config;
pub mod proxy_factory;
pub mod proxy_route_service;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

impl From<&AppConfig> for ForwardConfig {
  fn from(config: &AppConfig) -> Self {
    ForwardConfig {
      upstream_base: Box::from(config.upstream_url.as_str()),
      upstream_prefix: Box::from(config.upstream_prefix.as_str()),
      mount: Box::from(config.mount.as_str()),
      timeout: config.timeout,
      redact_errors: config.redact_errors,
    }
  }
}

/// Copies inbound headers for the upstream call. `host` is dropped so the
/// upstream sees its own authority; body framing is recomputed from the body
/// that is actually sent.
pub fn forwarded_headers<'a, I>(headers: I) -> HeaderMap
where
  I: IntoIterator<Item = (&'a HeaderName, &'a HeaderValue)>,
{
  let mut header_map = HeaderMap::new();

  for (name, value) in headers {
    if is_request_excluded(name) {
      continue;
    }

    header_map.append(name.clone(), value.clone());
  }

  header_map
}

/// Upstream response headers minus the ones the server re-derives for the
/// buffered body.
pub fn relayed_headers<'a, I>(headers: I) -> impl Iterator<Item = (&'a HeaderName, &'a HeaderValue)>
where
  I: IntoIterator<Item = (&'a HeaderName, &'a HeaderValue)>,
{
  headers.into_iter().filter(|(name, _)| !is_response_excluded(name))
}

#[inline]
fn is_request_excluded(name: &HeaderName) -> bool {
  name == header::HOST || name == header::CONTENT_LENGTH || name == header::TRANSFER_ENCODING
}

#[inline]
fn is_response_excluded(name: &HeaderName) -> bool {
  name == header::CONTENT_LENGTH || name == header::TRANSFER_ENCODING || name == header::CONNECTION
}
