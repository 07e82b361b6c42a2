//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Respects `RUST_LOG`; defaults to `info` when it is unset. Only binaries
/// call this, library code just emits through the `log` facade.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
