use actix_web::error::PayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Every way a single forwarding attempt can fail. A non-2xx upstream status
/// is not an error, it is relayed as-is.
#[derive(Debug, Error)]
pub enum ForwardError {
  #[error("Request timeout")]
  Timeout,
  #[error("{0}")]
  Connection(reqwest::Error),
  #[error("{0}")]
  Upstream(reqwest::Error),
  #[error("{0}")]
  InboundBody(#[from] PayloadError),
  #[error("Invalid request path")]
  DotSegment,
}

#[derive(Serialize, Debug)]
pub struct ErrorBody<'a> {
  pub error: &'a str,
}

impl From<reqwest::Error> for ForwardError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      ForwardError::Timeout
    } else if err.is_connect() {
      ForwardError::Connection(err)
    } else {
      ForwardError::Upstream(err)
    }
  }
}

impl ForwardError {
  /// Message safe to hand to callers without exposing upstream addressing.
  pub fn redacted_message(&self) -> &'static str {
    match self {
      ForwardError::Timeout => "Request timeout",
      ForwardError::Connection(_) => "Upstream service unavailable",
      ForwardError::Upstream(_) => "Upstream request failed",
      ForwardError::InboundBody(_) => "Request body could not be read",
      ForwardError::DotSegment => "Invalid request path",
    }
  }

  pub fn redacted_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(ErrorBody {
      error: self.redacted_message(),
    })
  }
}

impl ResponseError for ForwardError {
  fn status_code(&self) -> StatusCode {
    match self {
      ForwardError::Timeout => StatusCode::GATEWAY_TIMEOUT,
      ForwardError::DotSegment => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(ErrorBody {
      error: &self.to_string(),
    })
  }
}
