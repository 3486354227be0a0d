//! Process-wide logging setup shared by every binary.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing with the format named by `LOG_FORMAT` (`json` by default).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    self::tracing::init(format);
}
