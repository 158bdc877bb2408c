//! Logging setup for the command-line front-end

use data_accessor::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default filter when neither `RUST_LOG` nor the config sets one
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize logging to stderr
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(config);

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Filter from the merged config only; `RUST_LOG` already feeds `log_level`.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(effective_level(config)).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter: {e}");
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    })
}

fn effective_level(config: &LoggingConfig) -> &str {
    if config.log_level.is_empty() {
        DEFAULT_LOG_LEVEL
    } else {
        &config.log_level
    }
}
