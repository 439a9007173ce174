//! # Grindvakt Configuration System
//!
//! Hierarchical configuration for the Grindvakt trust filter.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of policy-critical parameters
//! - **Environment Awareness**: `GRINDVAKT_*` variables override file values

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod blacklist;
mod capture;
mod crl;
mod error;
mod telemetry;

pub use blacklist::BlacklistConfig;
pub use capture::CaptureConfig;
pub use crl::CrlConfig;
pub use error::ConfigError;
pub use telemetry::TelemetryConfig;

/// Top-level configuration container for all Grindvakt components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct GrindvaktConfig {
    /// Ingress/egress interfaces and capture parameters.
    #[validate(nested)]
    pub capture: CaptureConfig,

    /// Revocation source location and reload cadence.
    #[validate(nested)]
    pub crl: CrlConfig,

    /// Behavioral blacklist policy constants.
    #[validate(nested)]
    pub blacklist: BlacklistConfig,

    /// Audit log and live-report configuration.
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl GrindvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/grindvakt.yaml` - base settings. If missing, defaults are used.
    /// 3. `GRINDVAKT_*` environment variables (`__` separates nesting).
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(GrindvaktConfig::default()));

        if Path::new("config/grindvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/grindvakt.yaml"));
        }

        figment
            .merge(Env::prefixed("GRINDVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(GrindvaktConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("GRINDVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
