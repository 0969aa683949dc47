//! Log output setup for embedders.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a compact stdout subscriber at INFO, or DEBUG when `debug` is set.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let installed = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialized at {}", log_level);
    }
}
