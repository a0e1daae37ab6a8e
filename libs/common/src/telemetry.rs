//! Tracing subscriber setup shared by every binary in the workspace

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global fmt subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence; `default_level` applies when it is unset or
/// unparsable. Returns `false` when a global subscriber was already set.
pub fn init_tracing(default_level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
