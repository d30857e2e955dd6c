//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Filter directive for the configured level; `RUST_LOG` takes precedence.
fn filter_for(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripmate={level},reqwest=warn")))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = filter_for(config, verbose);
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logging already initialised: {}", e);
    }
}
