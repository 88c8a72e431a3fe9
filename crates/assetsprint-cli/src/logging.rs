//! Log output for the command-line tool
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here also picks those records up and writes everything to stderr so that
//! JSON printed on stdout stays clean.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` is honoured; `verbose` raises the default level to debug.
/// Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
