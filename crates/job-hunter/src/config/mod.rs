use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Whether internal failure details may be echoed back to clients.
    pub fn exposes_error_details(self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the gateway.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub kestra: KestraConfig,
    pub listings: ListingsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            kestra: KestraConfig::from_env()?,
            listings: ListingsConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output style for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Connection and flow settings for the Kestra workflow engine.
#[derive(Debug, Clone)]
pub struct KestraConfig {
    pub base_url: String,
    pub api_token: String,
    pub namespace: String,
    pub flow_id: String,
    pub request_timeout: Duration,
    pub status_retries: u32,
    pub retry_backoff: Duration,
}

impl KestraConfig {
    pub const DEFAULT_NAMESPACE: &'static str = "ai_job_hunter";
    pub const DEFAULT_FLOW_ID: &'static str = "job_application_pipeline";

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("KESTRA_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        let api_token = env::var("KESTRA_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingVar {
                var: "KESTRA_API_TOKEN",
            })?;

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            api_token,
            namespace: env::var("KESTRA_NAMESPACE")
                .unwrap_or_else(|_| Self::DEFAULT_NAMESPACE.to_string()),
            flow_id: env::var("KESTRA_FLOW_ID")
                .unwrap_or_else(|_| Self::DEFAULT_FLOW_ID.to_string()),
            request_timeout: Duration::from_secs(parse_var("KESTRA_TIMEOUT_SECS", 10)?),
            status_retries: parse_var("KESTRA_STATUS_RETRIES", 2)?,
            retry_backoff: Duration::from_millis(parse_var("KESTRA_RETRY_BACKOFF_MS", 200)?),
        })
    }

    /// Convenience constructor with default flow coordinates and hardening values.
    pub fn new(base_url: impl AsRef<str>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            api_token: api_token.into(),
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            flow_id: Self::DEFAULT_FLOW_ID.to_string(),
            request_timeout: Duration::from_secs(10),
            status_retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Location and read policy for the scraped listing dataset.
#[derive(Debug, Clone)]
pub struct ListingsConfig {
    pub data_path: PathBuf,
    pub cache: bool,
    pub read_timeout: Duration,
}

impl ListingsConfig {
    /// Reads the `JOBS_*` variables on their own, for commands that never reach Kestra.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let data_path =
            env::var("JOBS_DATA_PATH").unwrap_or_else(|_| "outputs/master_jobs.json".to_string());
        let cache = env::var("JOBS_CACHE")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            data_path: PathBuf::from(data_path),
            cache,
            read_timeout: Duration::from_secs(parse_var("JOBS_READ_TIMEOUT_SECS", 5)?),
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingVar { var: &'static str },
    InvalidNumber { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingVar { var } => write!(f, "{var} must be set"),
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingVar { .. }
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}
