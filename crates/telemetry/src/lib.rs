//! Logging and tracing bootstrap for the biblio service.

use biblio_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing/logging pipeline.
///
/// `RUST_LOG` takes precedence over the configured level. Safe to call
/// more than once; later calls are no-ops.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let initialized = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if initialized.is_ok() {
        tracing::debug!(
            target: "biblio-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let settings = TelemetrySettings::default();
        init(&settings);
        // Second call must not panic even though a subscriber is installed.
        init(&settings);
    }
}
