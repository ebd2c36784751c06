use std::time::Duration;

/// Immutable forwarding settings shared by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardConfig {
  /// Upstream scheme and authority, without a trailing slash.
  pub upstream_base: Box<str>,
  /// Normalized, either empty or `/segment[/segment...]`.
  pub upstream_prefix: Box<str>,
  /// Normalized like `upstream_prefix`.
  pub mount: Box<str>,
  pub timeout: Duration,
  pub redact_errors: bool,
}

impl ForwardConfig {
  /// Raw (still percent-encoded) inbound path with the mount prefix removed.
  pub fn path_suffix<'a>(&self, path: &'a str) -> &'a str {
    path.strip_prefix(self.mount.as_ref()).unwrap_or(path)
  }

  /// The query string is appended verbatim, parameters keep their order and
  /// encoding.
  pub fn target_url(&self, path_suffix: &str, query: &str) -> String {
    if query.is_empty() {
      format!("{}{}{}", self.upstream_base, self.upstream_prefix, path_suffix)
    } else {
      format!("{}{}{}?{}", self.upstream_base, self.upstream_prefix, path_suffix, query)
    }
  }
}

/// True when a segment is `.` or `..`, literally or percent-encoded. The URL
/// parser would resolve such segments and could climb out of the upstream
/// prefix.
pub fn has_dot_segment(path_suffix: &str) -> bool {
  path_suffix
    .split(['/', '\\'])
    .map(|segment| segment.to_ascii_lowercase().replace("%2e", "."))
    .any(|segment| segment == "." || segment == "..")
}
