use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so `--json` stdout stays parseable. `RUST_LOG` wins
/// over `--verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
