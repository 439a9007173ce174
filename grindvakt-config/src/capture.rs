//! Capture and forwarding interface configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingress/egress interfaces and pcap parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CaptureConfig {
    /// Untrusted interface messages are captured from.
    #[validate(length(min = 1))]
    #[serde(default = "default_ingress")]
    pub ingress_interface: String,

    /// Trusted interface accepted messages are forwarded to.
    #[validate(length(min = 1))]
    #[serde(default = "default_egress")]
    pub egress_interface: String,

    /// Capture snapshot length in bytes.
    #[validate(range(min = 512, max = 1_048_576))]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Promiscuous mode on the ingress interface.
    #[serde(default = "default_true")]
    pub promiscuous: bool,
}

fn default_ingress() -> String {
    "enp0s8".into()
}
fn default_egress() -> String {
    "veth1".into()
}
fn default_buffer_size() -> usize {
    65535
}
fn default_true() -> bool {
    true
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ingress_interface: default_ingress(),
            egress_interface: default_egress(),
            buffer_size: default_buffer_size(),
            promiscuous: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interface_is_invalid() {
        let mut config = CaptureConfig::default();
        config.ingress_interface.clear();
        assert!(config.validate().is_err());
    }
}
