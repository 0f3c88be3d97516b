//! Tracing setup
//!
//! `RUST_LOG` selects the filter (default `warn`); `RUST_LOG_FORMAT` picks
//! `json`, `compact` or `pretty` (default). Events go to stderr so they
//! never interleave with the console report on stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() -> Result<()> {
    init_with_defaults("warn")
}

pub fn init_with_defaults(default_filter: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format.as_str() {
        "json" => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false).json())
            .try_init(),
        "compact" => registry
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init(),
        _ => registry
            .with(fmt::layer().with_writer(std::io::stderr).pretty())
            .try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialize tracing: {e}"))
}
