//! Logging initialization.

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    Json,
    /// Human-readable multi-line output.
    #[default]
    Pretty,
}

/// Installs the global subscriber. `RUST_LOG` selects levels (default
/// `info`). Later calls are no-ops.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);
        match format {
            LogFormat::Json => registry.with(fmt::layer().json()).init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Json);
        tracing::info!("logging initialized");
    }
}
