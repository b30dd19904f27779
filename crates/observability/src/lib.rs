//! Process-wide logging setup shared by every PharmaSafe binary.

/// Initialize structured logging with the default `info` filter.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    tracing::init("info");
}

/// Subscriber construction and filter resolution.
pub mod tracing;
