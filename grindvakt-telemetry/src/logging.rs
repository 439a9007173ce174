//! Live console reporting via `tracing`.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber. `RUST_LOG` overrides the
    /// default `info` filter.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_env_filter_parses() {
        // EnvFilter comes from tracing-subscriber's `env-filter` feature,
        // which this crate must enable itself rather than inherit.
        let filter = EnvFilter::new("info");
        assert_eq!(filter.to_string(), "info");
    }
}
