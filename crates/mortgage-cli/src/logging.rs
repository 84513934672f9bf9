//! Subscriber setup

use mortgage_core::{LogConfig, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const FALLBACK_FILTER: &str = "info";

/// Install the global subscriber, logging to stderr
///
/// An unparsable filter directive falls back to `info`.
pub(crate) fn init(config: &LogConfig) {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|err| {
        eprintln!("invalid log filter '{}': {err}, using {FALLBACK_FILTER}", config.level);
        EnvFilter::new(FALLBACK_FILTER)
    });

    let result = tracing_subscriber::registry()
        .with(stderr_layer(config.format).with_filter(filter))
        .try_init();
    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}

fn stderr_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Text => Box::new(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        ),
    }
}
