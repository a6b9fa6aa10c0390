//! Logging setup for hosts embedding the activator.
//!
//! The crate itself only emits `tracing` events; this installs a subscriber
//! for them with human-readable or JSON output.

use crate::config::LoggingSettings;
use crate::error::ConfigError;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Respects `RUST_LOG` when set, otherwise filters at `settings.level`.
/// Fails rather than panics when a global subscriber is already installed.
pub fn setup_logging(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let log_level = settings.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if settings.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()
    };
    result.map_err(|e| ConfigError::LoggingSetup(e.to_string()))?;

    info!("Activator logging initialized with level: {}", log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_setup_fails_cleanly() {
        let settings = LoggingSettings::default();
        // Another test may already own the global subscriber.
        let _ = setup_logging(&settings);
        assert!(matches!(
            setup_logging(&settings),
            Err(ConfigError::LoggingSetup(_))
        ));
    }
}
