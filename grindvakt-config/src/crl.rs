//! Revocation source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Location of the CRL file and how often to re-read it.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CrlConfig {
    /// Path to the JSON CRL file.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Seconds between reloads; the reload runs inline on the packet path.
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,
}

fn default_path() -> PathBuf {
    "crl.json".into()
}
fn default_reload_interval() -> u64 {
    10
}

impl Default for CrlConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            reload_interval_secs: default_reload_interval(),
        }
    }
}
