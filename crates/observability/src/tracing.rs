//! JSON log output filtered through `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Resolve the active filter: `RUST_LOG` when set and valid, else `default`.
pub fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a JSON subscriber. Later calls are no-ops.
pub fn init(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default))
        .json()
        .with_current_span(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init("warn");
        init("debug");
        crate::init();
    }

    #[test]
    fn fallback_filter_is_used_without_env() {
        // RUST_LOG may be set by the harness; only assert on the fallback path.
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(filter("warn").to_string(), "warn");
        }
    }
}
