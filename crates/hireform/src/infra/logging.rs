//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HIREFORM_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global fmt subscriber writing to stderr.
///
/// The filter comes from `HIREFORM_LOG` and falls back to warnings only. Calling this twice is
/// harmless; the second install is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
