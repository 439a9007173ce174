//! Behavioral blacklist policy configuration.
//!
//! The defaults match the deployed policy: three CRL violations inside a
//! 60-second window earn a 300-second ban.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Escalation policy constants.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct BlacklistConfig {
    /// Violations within the window required to blacklist an identifier.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_threshold")]
    pub violation_threshold: u32,

    /// Trailing window (seconds) over which violations are counted.
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_window")]
    pub violation_window_secs: u64,

    /// How long (seconds) a blacklisted identifier stays banned.
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
}

fn default_threshold() -> u32 {
    3
}
fn default_window() -> u64 {
    60
}
fn default_duration() -> u64 {
    300
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            violation_threshold: default_threshold(),
            violation_window_secs: default_window(),
            duration_secs: default_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_is_invalid() {
        let mut config = BlacklistConfig::default();
        config.violation_threshold = 0;
        assert!(config.validate().is_err());
    }
}
