//! Audit log and live-report configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where drop/blacklist records go and how often aggregate stats print.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Durable audit log receiving every drop and blacklist transition.
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: PathBuf,

    /// Print aggregate counters to the live report every N packets.
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u64,
}

fn default_audit_log_path() -> PathBuf {
    "crl_drops.log".into()
}
fn default_stats_interval() -> u64 {
    100
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            audit_log_path: default_audit_log_path(),
            stats_interval: default_stats_interval(),
        }
    }
}
