//! Diagnostic logging for action processes.
//!
//! Standard output carries the action result, so the subscriber installed
//! here writes to standard error only. Verbosity is taken from `WHISK_LOG`
//! (an `EnvFilter` directive such as `debug` or `whisk=trace`).

use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "WHISK_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the stderr subscriber. Returns `false` if a global subscriber
/// was already set, in which case nothing changes.
pub fn try_init() -> bool {
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
