use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Distinguishes runtime behavior for different deployments of the console.
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
}

/// Top-level configuration for the console.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("HR_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let raw_url =
            env::var("HR_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let base_url = BackendConfig::parse_base_url(&raw_url)?;

        let timeout_secs = env::var("HR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let session_file = env::var("HR_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".hr-console-session"));

        let log_level = env::var("HR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            backend: BackendConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            session: SessionConfig { path: session_file },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the HR backend lives and how long a single call may take.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidApiUrl {
            value: raw.to_string(),
            source,
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::UnsupportedScheme {
                value: raw.to_string(),
            }),
        }
    }
}

/// Location of the persisted session credential.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl {
        value: String,
        source: url::ParseError,
    },
    UnsupportedScheme {
        value: String,
    },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl { value, .. } => {
                write!(f, "HR_API_URL '{value}' is not a valid URL")
            }
            ConfigError::UnsupportedScheme { value } => {
                write!(f, "HR_API_URL '{value}' must use http or https")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "HR_TIMEOUT_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidApiUrl { source, .. } => Some(source),
            ConfigError::UnsupportedScheme { .. } | ConfigError::InvalidTimeout => None,
        }
    }
}
