use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directives, e.g. `EXPLOREKIT_LOG=explorekit=debug`.
const LOG_ENV: &str = "EXPLOREKIT_LOG";

/// Log to stderr so JSON on stdout stays machine-readable.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_filter.to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .init();
}
