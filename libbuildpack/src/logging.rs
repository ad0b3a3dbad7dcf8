use crate::Env;
use tracing::Level;

/// Enables debug output when this variable is set, regardless of its value.
pub(crate) const DEBUG_ENV_VAR: &str = "BP_DEBUG";

pub(crate) fn log_level(env: &Env) -> Level {
    if env.contains_key(DEBUG_ENV_VAR) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Installs a subscriber that writes log events to stderr.
///
/// Does nothing if a global subscriber has already been set.
pub(crate) fn init_logging(env: &Env) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(env))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
