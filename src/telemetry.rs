use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("unable to install log subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// HTTP plumbing is chatty at debug; keep it at warn unless RUST_LOG asks.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

/// Level the console logs at: `-v` lifts the configured level to debug,
/// `-vv` and beyond to trace.
pub fn effective_level(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.trim().to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub(crate) fn filter_directives(level: &str) -> String {
    format!("{level},{QUIET_DEPENDENCIES}")
}

/// Installs the global subscriber. Log lines go to stderr so rendered pages
/// on stdout stay clean. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig, verbose: u8) -> Result<(), TelemetryError> {
    let level = effective_level(&config.log_level, verbose);
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(filter_directives(&level)).map_err(|source| TelemetryError::Filter {
            value: level.clone(),
            source,
        })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
