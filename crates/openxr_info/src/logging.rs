//! Console logging for the probe

pub use log::{debug, error, info, trace, warn};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Progress lines are the operator's only feedback during a failed run, so
/// the default filter keeps `info` visible.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp(None)
        .init();
}
