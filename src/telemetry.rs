use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MARKS_LOG";

/// Installs a formatting subscriber filtered by `MARKS_LOG` (default `info`).
///
/// Returns `false` when a global subscriber was already set, which makes the
/// call safe to repeat from tests and embedding applications.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
