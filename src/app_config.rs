use clap::Parser;
use log::LevelFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKER_COUNT: usize = 4;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PREFIX: &str = "/api";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const ANY_ORIGIN: &str = "*";

#[derive(Parser, Debug, Default)]
#[command(version, about = "Forwards every request under a mount prefix to a single upstream service")]
pub struct CliArgs {
  /// Optional YAML file with the same settings; flags and env vars override it.
  #[arg(long, env = "FORWARD_CONFIG")]
  pub config: Option<PathBuf>,

  /// Base URL of the upstream service, e.g. http://localhost:3000
  #[arg(long, env = "UPSTREAM_URL")]
  pub upstream_url: Option<String>,

  /// Path prefix inserted between the upstream base URL and the forwarded path.
  #[arg(long, env = "UPSTREAM_PREFIX")]
  pub upstream_prefix: Option<String>,

  /// Inbound path prefix under which requests are forwarded.
  #[arg(long, env = "MOUNT_PREFIX")]
  pub mount: Option<String>,

  #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
  pub timeout_secs: Option<u64>,

  /// Comma separated list of allowed origins, `*` allows any origin.
  #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
  pub cors_origins: Option<Vec<String>>,

  #[arg(long, env = "HTTP_BIND")]
  pub bind: Option<String>,

  #[arg(long, env = "HTTP_PORT")]
  pub port: Option<u16>,

  #[arg(long, env = "HTTP_WORKER_COUNT")]
  pub workers: Option<usize>,

  #[arg(long, env = "HTTP_PROXY_URL")]
  pub egress_proxy: Option<String>,

  #[arg(long, env = "HTTP_PROXY_USER")]
  pub egress_proxy_user: Option<String>,

  #[arg(long, env = "HTTP_PROXY_PASS")]
  pub egress_proxy_pass: Option<String>,

  #[arg(long, env = "LOG_LEVEL")]
  pub log_level: Option<String>,

  /// Return generic messages instead of upstream failure details.
  #[arg(long, env = "REDACT_UPSTREAM_ERRORS")]
  pub redact_errors: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(default)]
pub struct FileConfig {
  pub upstream_url: Option<String>,
  pub upstream_prefix: Option<String>,
  pub mount: Option<String>,
  pub timeout_secs: Option<u64>,
  pub cors_origins: Option<Vec<String>>,
  pub bind: Option<String>,
  pub port: Option<u16>,
  pub workers: Option<usize>,
  pub egress_proxy: Option<String>,
  pub egress_proxy_user: Option<String>,
  pub egress_proxy_pass: Option<String>,
  pub log_level: Option<String>,
  pub redact_errors: Option<bool>,
}

impl FileConfig {
  pub fn load_from_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let file_config: FileConfig = serde_yaml::from_reader(file)?;

    Ok(file_config)
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unable to read config file '{}': {source}", .path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("malformed config file: {0}")]
  Yaml(#[from] serde_yaml::Error),
  #[error("upstream URL is not configured, set UPSTREAM_URL or --upstream-url")]
  MissingUpstreamUrl,
  #[error("invalid upstream URL '{url}': {reason}")]
  InvalidUpstreamUrl { url: String, reason: String },
  #[error("upstream timeout must be greater than zero")]
  ZeroTimeout,
  #[error("worker count must be greater than zero")]
  ZeroWorkers,
  #[error("unknown log level '{0}'")]
  InvalidLogLevel(String),
}

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub upstream_url: String,
  pub upstream_prefix: String,
  pub mount: String,
  pub timeout: Duration,
  pub cors_origins: Vec<String>,
  pub bind: String,
  pub port: u16,
  pub workers: usize,
  pub egress_proxy: Option<String>,
  pub egress_proxy_user: Option<String>,
  pub egress_proxy_pass: Option<String>,
  pub log_level: LevelFilter,
  pub redact_errors: bool,
}

impl AppConfig {
  pub fn load(args: CliArgs) -> Result<AppConfig, ConfigError> {
    let file_config = match &args.config {
      Some(path) => FileConfig::load_from_file(path)?,
      None => FileConfig::default(),
    };

    AppConfig::merge(args, file_config)
  }

  /// Flags (and their env vars) win over the file, the file wins over defaults.
  pub fn merge(args: CliArgs, file: FileConfig) -> Result<AppConfig, ConfigError> {
    let upstream_url = args
      .upstream_url
      .or(file.upstream_url)
      .ok_or(ConfigError::MissingUpstreamUrl)?;
    let upstream_url = validate_upstream_url(&upstream_url)?;

    let timeout_secs = args.timeout_secs.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
      return Err(ConfigError::ZeroTimeout);
    }

    let workers = args.workers.or(file.workers).unwrap_or(DEFAULT_WORKER_COUNT);
    if workers == 0 {
      return Err(ConfigError::ZeroWorkers);
    }

    let log_level = match args.log_level.or(file.log_level) {
      Some(level) => LevelFilter::from_str(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?,
      None => LevelFilter::Info,
    };

    let cors_origins = args
      .cors_origins
      .or(file.cors_origins)
      .map(|origins| {
        origins
          .into_iter()
          .map(|origin| origin.trim().to_string())
          .filter(|origin| !origin.is_empty())
          .collect::<Vec<String>>()
      })
      .filter(|origins| !origins.is_empty())
      .unwrap_or_else(|| vec![ANY_ORIGIN.to_string()]);

    Ok(AppConfig {
      upstream_url,
      upstream_prefix: normalize_prefix(&args.upstream_prefix.or(file.upstream_prefix).unwrap_or(DEFAULT_PREFIX.into())),
      mount: normalize_prefix(&args.mount.or(file.mount).unwrap_or(DEFAULT_PREFIX.into())),
      timeout: Duration::from_secs(timeout_secs),
      cors_origins,
      bind: args.bind.or(file.bind).unwrap_or(DEFAULT_BIND.into()),
      port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
      workers,
      egress_proxy: args.egress_proxy.or(file.egress_proxy),
      egress_proxy_user: args.egress_proxy_user.or(file.egress_proxy_user),
      egress_proxy_pass: args.egress_proxy_pass.or(file.egress_proxy_pass),
      log_level,
      redact_errors: args.redact_errors || file.redact_errors.unwrap_or(false),
    })
  }

  pub fn allows_any_origin(&self) -> bool {
    self.cors_origins.iter().any(|origin| origin == ANY_ORIGIN)
  }
}

/// `""` and `"/"` mean no prefix, anything else gets exactly one leading slash
/// and no trailing slash.
pub fn normalize_prefix(prefix: &str) -> String {
  let trimmed = prefix.trim().trim_matches('/');

  if trimmed.is_empty() {
    String::new()
  } else {
    format!("/{}", trimmed)
  }
}

fn validate_upstream_url(raw: &str) -> Result<String, ConfigError> {
  let raw = raw.trim();
  let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUpstreamUrl {
    url: raw.to_string(),
    reason: err.to_string(),
  })?;

  match url.scheme() {
    "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
    scheme => Err(ConfigError::InvalidUpstreamUrl {
      url: raw.to_string(),
      reason: format!("unsupported scheme '{}'", scheme),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args_with_upstream(url: &str) -> CliArgs {
    CliArgs {
      upstream_url: Some(url.into()),
      ..CliArgs::default()
    }
  }

  #[test]
  fn applies_defaults() {
    let config = AppConfig::merge(args_with_upstream("http://upstream:3000"), FileConfig::default()).unwrap();

    assert_eq!(config.upstream_url, "http://upstream:3000");
    assert_eq!(config.upstream_prefix, "/api");
    assert_eq!(config.mount, "/api");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.cors_origins, vec!["*".to_string()]);
    assert_eq!(config.bind, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.workers, 4);
    assert_eq!(config.log_level, LevelFilter::Info);
    assert!(config.allows_any_origin());
    assert!(!config.redact_errors);
  }

  #[test]
  fn flags_override_file_values() {
    let args = CliArgs {
      upstream_url: Some("http://from-flag:3000/".into()),
      timeout_secs: Some(5),
      ..CliArgs::default()
    };
    let file = FileConfig {
      upstream_url: Some("http://from-file:3000".into()),
      timeout_secs: Some(30),
      port: Some(9000),
      mount: Some("gateway/".into()),
      ..FileConfig::default()
    };

    let config = AppConfig::merge(args, file).unwrap();

    assert_eq!(config.upstream_url, "http://from-flag:3000");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.port, 9000);
    assert_eq!(config.mount, "/gateway");
  }

  #[test]
  fn parses_yaml_file_config() {
    let yaml = "upstream_url: http://localhost:3000\ncors_origins:\n  - https://a.example\n  - https://b.example\nredact_errors: true\n";
    let file: FileConfig = serde_yaml::from_str(yaml).unwrap();

    let config = AppConfig::merge(CliArgs::default(), file).unwrap();

    assert_eq!(config.cors_origins, vec!["https://a.example".to_string(), "https://b.example".to_string()]);
    assert!(!config.allows_any_origin());
    assert!(config.redact_errors);
  }

  #[test]
  fn missing_upstream_url_is_an_error() {
    let result = AppConfig::merge(CliArgs::default(), FileConfig::default());

    assert!(matches!(result, Err(ConfigError::MissingUpstreamUrl)));
  }

  #[test]
  fn rejects_invalid_upstream_url() {
    let result = AppConfig::merge(args_with_upstream("localhost:3000"), FileConfig::default());
    assert!(matches!(result, Err(ConfigError::InvalidUpstreamUrl { .. })));

    let result = AppConfig::merge(args_with_upstream("not a url"), FileConfig::default());
    assert!(matches!(result, Err(ConfigError::InvalidUpstreamUrl { .. })));
  }

  #[test]
  fn rejects_zero_timeout_and_unknown_log_level() {
    let args = CliArgs {
      timeout_secs: Some(0),
      ..args_with_upstream("http://upstream:3000")
    };
    assert!(matches!(AppConfig::merge(args, FileConfig::default()), Err(ConfigError::ZeroTimeout)));

    let args = CliArgs {
      log_level: Some("chatty".into()),
      ..args_with_upstream("http://upstream:3000")
    };
    assert!(matches!(AppConfig::merge(args, FileConfig::default()), Err(ConfigError::InvalidLogLevel(_))));
  }

  #[test]
  fn blank_origin_list_falls_back_to_any() {
    let args = CliArgs {
      cors_origins: Some(vec![" ".into(), "".into()]),
      ..args_with_upstream("http://upstream:3000")
    };

    let config = AppConfig::merge(args, FileConfig::default()).unwrap();

    assert!(config.allows_any_origin());
  }

  #[test]
  fn normalizes_prefixes() {
    assert_eq!(normalize_prefix(""), "");
    assert_eq!(normalize_prefix("/"), "");
    assert_eq!(normalize_prefix("api"), "/api");
    assert_eq!(normalize_prefix("/api/"), "/api");
    assert_eq!(normalize_prefix("/v1/api"), "/v1/api");
  }

  #[test]
  fn missing_config_file_is_reported() {
    let args = CliArgs {
      config: Some(PathBuf::from("/nonexistent/forwarder.yaml")),
      ..args_with_upstream("http://upstream:3000")
    };

    assert!(matches!(AppConfig::load(args), Err(ConfigError::Io { .. })));
  }

  #[test]
  fn cli_parses_flags() {
    let args = CliArgs::try_parse_from([
      "api_forwarder",
      "--upstream-url",
      "http://upstream:3000",
      "--cors-origins",
      "https://a.example,https://b.example",
      "--redact-errors",
    ])
    .unwrap();

    assert_eq!(args.upstream_url.as_deref(), Some("http://upstream:3000"));
    assert_eq!(args.cors_origins.map(|o| o.len()), Some(2));
    assert!(args.redact_errors);
  }
}
