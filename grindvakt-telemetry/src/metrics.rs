//! Prometheus counters for the filter's aggregate statistics.

use prometheus::{IntCounter, IntGauge, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub packets_total: IntCounter,
    pub accepted_total: IntCounter,
    pub crl_drops_total: IntCounter,
    pub blacklist_drops_total: IntCounter,
    pub blacklisted_identifiers: IntGauge,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let packets_total =
            IntCounter::new("grindvakt_packets_total", "Total captured messages").unwrap();
        let accepted_total =
            IntCounter::new("grindvakt_accepted_total", "Messages forwarded to egress").unwrap();
        let crl_drops_total = IntCounter::new(
            "grindvakt_crl_drops_total",
            "Messages dropped for a revoked identifier",
        )
        .unwrap();
        let blacklist_drops_total = IntCounter::new(
            "grindvakt_blacklist_drops_total",
            "Messages dropped for a blacklisted identifier",
        )
        .unwrap();
        let blacklisted_identifiers = IntGauge::new(
            "grindvakt_blacklisted_identifiers",
            "Identifiers currently blacklisted",
        )
        .unwrap();

        registry.register(Box::new(packets_total.clone())).unwrap();
        registry.register(Box::new(accepted_total.clone())).unwrap();
        registry.register(Box::new(crl_drops_total.clone())).unwrap();
        registry
            .register(Box::new(blacklist_drops_total.clone()))
            .unwrap();
        registry
            .register(Box::new(blacklisted_identifiers.clone()))
            .unwrap();

        Self {
            registry,
            packets_total,
            accepted_total,
            crl_drops_total,
            blacklist_drops_total,
            blacklisted_identifiers,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
