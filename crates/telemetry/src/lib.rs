//! Tracing subscriber bootstrap.

use anyhow::Context;
use booklist_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Builds the filter, preferring `RUST_LOG` over the configured directive.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .with_context(|| format!("invalid log filter '{}'", settings.filter)),
    }
}

/// Install the global tracing subscriber.
///
/// Calling this twice is harmless; the second subscriber is discarded.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "booklist-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            filter: "booklist=loudest".to_string(),
        };

        let err = env_filter(&settings).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }

    #[test]
    fn init_is_idempotent() {
        let settings = TelemetrySettings::default();
        init(&settings).unwrap();
        init(&settings).unwrap();
    }
}
