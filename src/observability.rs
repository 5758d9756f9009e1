use anyhow::Result;
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

pub const SERVICE_NAME: &str = "umami";

/// Shape of the log lines written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per event, spans flattened in.
    Json,
    /// Human readable, with targets, thread ids and line numbers.
    Pretty,
}

impl LogFormat {
    /// The configured format, else JSON when `environment` is `production`.
    pub fn resolve(configured: Option<LogFormat>, environment: Option<&str>) -> Self {
        match (configured, environment) {
            (Some(format), _) => format,
            (None, Some("production")) => Self::Json,
            (None, _) => Self::Pretty,
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails when a
/// subscriber is already installed.
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let environment = std::env::var("ENVIRONMENT").ok();
    let format = LogFormat::resolve(config.log_format, environment.as_deref());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_filter(env_filter),
            )
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_filter(env_filter),
            )
            .try_init()?,
    }

    tracing::info!(
        service.name = SERVICE_NAME,
        service.version = env!("CARGO_PKG_VERSION"),
        log.format = ?format,
        "logging initialized"
    );

    Ok(())
}

pub fn shutdown_observability() {
    tracing::info!(service.name = SERVICE_NAME, "shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_environment_unless_configured() {
        assert_eq!(LogFormat::resolve(None, Some("production")), LogFormat::Json);
        assert_eq!(LogFormat::resolve(None, Some("staging")), LogFormat::Pretty);
        assert_eq!(LogFormat::resolve(None, None), LogFormat::Pretty);
        assert_eq!(
            LogFormat::resolve(Some(LogFormat::Pretty), Some("production")),
            LogFormat::Pretty
        );
        assert_eq!(LogFormat::resolve(Some(LogFormat::Json), None), LogFormat::Json);
    }

    #[test]
    fn test_observability_init_once() {
        let config = ObservabilityConfig {
            log_level: "debug".to_owned(),
            log_format: Some(LogFormat::Pretty),
        };

        let first = init_observability(&config);
        assert!(first.is_ok(), "{:?}", first.err());

        // A global subscriber is already installed.
        assert!(init_observability(&config).is_err());
    }
}
