use actix_web::http::Method;
use std::fmt::{Display, Formatter};

/// Methods accepted under the mount prefix. Anything else is rejected before
/// an upstream call is attempted.
#[derive(PartialEq, Debug, Clone, Copy, Hash, Eq)]
pub enum HttpMethod {
  Get,
  Post,
  Put,
  Delete,
  Patch,
  Options,
}

impl HttpMethod {
  /// Only these methods have their inbound body read and forwarded.
  pub fn carries_body(self) -> bool {
    matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
  }
}

impl TryFrom<&Method> for HttpMethod {
  type Error = ();

  fn try_from(value: &Method) -> Result<Self, Self::Error> {
    match *value {
      Method::GET => Ok(HttpMethod::Get),
      Method::POST => Ok(HttpMethod::Post),
      Method::PUT => Ok(HttpMethod::Put),
      Method::DELETE => Ok(HttpMethod::Delete),
      Method::PATCH => Ok(HttpMethod::Patch),
      Method::OPTIONS => Ok(HttpMethod::Options),
      _ => Err(()),
    }
  }
}

impl From<HttpMethod> for Method {
  fn from(value: HttpMethod) -> Self {
    match value {
      HttpMethod::Get => Method::GET,
      HttpMethod::Post => Method::POST,
      HttpMethod::Put => Method::PUT,
      HttpMethod::Delete => Method::DELETE,
      HttpMethod::Patch => Method::PATCH,
      HttpMethod::Options => Method::OPTIONS,
    }
  }
}

impl Display for HttpMethod {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      HttpMethod::Get => f.write_str("GET"),
      HttpMethod::Post => f.write_str("POST"),
      HttpMethod::Put => f.write_str("PUT"),
      HttpMethod::Delete => f.write_str("DELETE"),
      HttpMethod::Patch => f.write_str("PATCH"),
      HttpMethod::Options => f.write_str("OPTIONS"),
    }
  }
}
