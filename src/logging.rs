//! Tracing subscriber setup for the binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level selected by the `-v` / `-q` flags.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over the flags when set.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet).as_str().to_ascii_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
