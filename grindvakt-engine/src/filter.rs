//! ## grindvakt-engine::filter
//! The trust-enforcement pipeline. Owns every mutable table (revocation
//! sets, violation log, blacklist, short-id association table); all
//! mutation goes through `process`, which runs one message to a terminal
//! verdict. No ambient globals, no locking needed in the single-stream
//! design.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use grindvakt_blacklist::{BlacklistEngine, BlacklistPolicy, Promotion, PromotionReason};
use grindvakt_crl::RevocationStore;
use grindvakt_identity::{classify, CertHash, Identity, IdentityKey, ShortId};
use grindvakt_telemetry::audit::format_time_ms;
use grindvakt_telemetry::{AuditLog, MetricsRecorder};

/// Terminal verdict for one captured message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Forward unchanged to the trusted-side interface.
    Accepted,
    /// Unsupported size class; nothing mutated, no escalation.
    DroppedMalformed,
    /// Identifier is currently banned; audited to file only.
    DroppedBlacklisted,
    /// Identifier is in the current CRL snapshot; a violation was recorded.
    DroppedRevoked,
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Aggregate counters, mirrored into Prometheus.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterStats {
    pub total: u64,
    pub accepted: u64,
    pub crl_drops: u64,
    pub blacklist_drops: u64,
}

/// Sequences the revocation store, identity extractor and blacklist engine
/// into an accept/drop decision per message.
pub struct TrustFilter {
    store: RevocationStore,
    engine: BlacklistEngine,
    /// Short id observed on a full certificate -> that certificate's
    /// fingerprint. Overwritten on re-sighting, never expires.
    associations: HashMap<ShortId, CertHash>,
    stats: FilterStats,
    stats_interval: u64,
    metrics: Arc<MetricsRecorder>,
    audit: Arc<AuditLog>,
}

impl TrustFilter {
    pub fn new(
        store: RevocationStore,
        policy: BlacklistPolicy,
        stats_interval: u64,
        metrics: Arc<MetricsRecorder>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            store,
            engine: BlacklistEngine::new(policy),
            associations: HashMap::new(),
            stats: FilterStats::default(),
            // Config validation enforces a minimum of 1, but this is
            // public API; a zero interval must not panic the modulo below.
            stats_interval: stats_interval.max(1),
            metrics,
            audit,
        }
    }

    /// Runs one message through the pipeline. `now_ms` is the arrival time
    /// in Unix milliseconds; the caller supplies it so the window and
    /// expiry logic is deterministic under test.
    pub fn process(&mut self, frame: &[u8], now_ms: u64) -> Verdict {
        self.store.reload_if_due();
        self.sweep(now_ms);

        self.stats.total += 1;
        self.metrics.packets_total.inc();
        if self.stats.total % self.stats_interval == 0 {
            self.report_stats();
        }

        let identity = match classify(frame) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("{e}, packet discarded");
                return Verdict::DroppedMalformed;
            }
        };

        // Remember which certificate a short id belongs to, for
        // cross-referencing in later escalations.
        if let Identity::FullCertificate {
            full_hash,
            short_id,
        } = identity
        {
            self.associations.insert(short_id, full_hash);
        }

        let key = identity.primary_key();

        // Blacklist check first: cheap, and an already-banned actor must
        // not accrue further violations. Suppressed from the live console.
        if self.engine.is_blacklisted(&key, now_ms) {
            self.audit.drop_record(
                key.category(),
                &key.short_display(),
                "BLACKLISTED - Repeated violations",
                frame.len(),
            );
            self.stats.blacklist_drops += 1;
            self.metrics.blacklist_drops_total.inc();
            return Verdict::DroppedBlacklisted;
        }

        let (revoked, related, reason) = match identity {
            Identity::FullCertificate {
                full_hash,
                short_id,
            } => (
                self.store.is_certificate_revoked(&full_hash),
                Some(IdentityKey::Short(short_id)),
                "Certificate revoked in CRL",
            ),
            Identity::CompactId { id } => (
                self.store.is_short_id_revoked(&id),
                None,
                "HashedID revoked in CRL",
            ),
        };

        if revoked {
            let promotions = self.engine.record_violation(key, related, now_ms);
            self.audit
                .drop_record(key.category(), &key.short_display(), reason, frame.len());
            info!("[DROP] {}: {} - {reason}", key.category(), key.short_display());
            self.stats.crl_drops += 1;
            self.metrics.crl_drops_total.inc();
            self.report_promotions(&promotions);
            return Verdict::DroppedRevoked;
        }

        info!("[ACCEPT] {}: {}", key.category(), key.short_display());
        self.stats.accepted += 1;
        self.metrics.accepted_total.inc();
        Verdict::Accepted
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    pub fn blacklisted_count(&self) -> usize {
        self.engine.blacklisted_count()
    }

    /// Emits the aggregate counters to the live report.
    pub fn report_stats(&self) {
        info!(
            "[STATS] Total: {}, Accepted: {}, CRL Drops: {}, Blacklist Drops: {}, Blacklisted: {}",
            self.stats.total,
            self.stats.accepted,
            self.stats.crl_drops,
            self.stats.blacklist_drops,
            self.engine.blacklisted_count()
        );
    }

    /// Final stats at shutdown, to both the live report and the audit file.
    pub fn log_final_stats(&self) {
        self.report_stats();
        self.audit.note(&format!(
            "CRL FILTER STOPPED - Final Stats: Total: {}, Accepted: {}, CRL Drops: {}, Blacklist Drops: {}, Blacklisted: {}",
            self.stats.total,
            self.stats.accepted,
            self.stats.crl_drops,
            self.stats.blacklist_drops,
            self.engine.blacklisted_count()
        ));
    }

    /// Expiry sweep, once per message cycle. Lapsed bans are audited as
    /// UNBLACKLISTED transitions.
    fn sweep(&mut self, now_ms: u64) {
        for key in self.engine.sweep(now_ms) {
            self.audit
                .blacklist_record("UNBLACKLISTED", &key.to_string(), "Blacklist time expired");
            warn!("[BLACKLIST] UNBLACKLISTED: {}", key.short_display());
        }
        self.metrics
            .blacklisted_identifiers
            .set(self.engine.blacklisted_count() as i64);
    }

    fn report_promotions(&self, promotions: &[Promotion]) {
        for promotion in promotions {
            let until = format_time_ms(promotion.expiry_ms);
            let detail = match &promotion.reason {
                PromotionReason::RepeatedViolations { count, window_secs } => {
                    let linked = match promotion.key {
                        IdentityKey::Short(id) => self
                            .associations
                            .get(&id)
                            .map(|hash| format!(" (certificate {})", hash.short_display()))
                            .unwrap_or_default(),
                        IdentityKey::Cert(_) => String::new(),
                    };
                    format!("{count} violations in {window_secs}s - until {until}{linked}")
                }
                PromotionReason::LinkedTo(primary) => format!(
                    "Related short id of certificate {} - until {until}",
                    primary.short_display()
                ),
            };
            self.audit
                .blacklist_record("BLACKLISTED", &promotion.key.to_string(), &detail);
            warn!(
                "[BLACKLIST] BLACKLISTED: {} - {detail}",
                promotion.key.short_display()
            );
        }
        self.metrics
            .blacklisted_identifiers
            .set(self.engine.blacklisted_count() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::time::Duration;

    use sha2::{Digest, Sha256};
    use tempfile::TempDir;

    use grindvakt_identity::classify::{
        CERT_PAYLOAD_END, CERT_PAYLOAD_START, COMPACT_MSG_LEN, FULL_CERT_MSG_LEN, SHORT_ID_END,
        SHORT_ID_START,
    };

    const SEC: u64 = 1_000;

    struct Harness {
        filter: TrustFilter,
        crl_path: std::path::PathBuf,
        _dir: TempDir,
    }

    impl Harness {
        fn new(crl_json: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let crl_path = dir.path().join("crl.json");
            fs::write(&crl_path, crl_json).unwrap();

            let mut store = RevocationStore::new(&crl_path, Duration::from_secs(3600));
            store.reload().unwrap();

            let audit = AuditLog::open(dir.path().join("audit.log")).unwrap();
            let filter = TrustFilter::new(
                store,
                BlacklistPolicy::default(),
                100,
                Arc::new(MetricsRecorder::new()),
                Arc::new(audit),
            );
            Self {
                filter,
                crl_path,
                _dir: dir,
            }
        }

        fn rewrite_crl(&mut self, crl_json: &str) {
            let mut f = fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.crl_path)
                .unwrap();
            f.write_all(crl_json.as_bytes()).unwrap();
            self.filter.store.reload().unwrap();
        }
    }

    fn full_cert_frame(fill: u8) -> Vec<u8> {
        vec![fill; FULL_CERT_MSG_LEN]
    }

    fn cert_hash_hex(frame: &[u8]) -> String {
        hex::encode(Sha256::digest(&frame[CERT_PAYLOAD_START..CERT_PAYLOAD_END]))
    }

    fn short_id_hex(frame: &[u8]) -> String {
        let digest = Sha256::digest(&frame[CERT_PAYLOAD_START..CERT_PAYLOAD_END]);
        hex::encode(&digest[24..])
    }

    fn compact_frame(id: [u8; 8]) -> Vec<u8> {
        let mut frame = vec![0u8; COMPACT_MSG_LEN];
        frame[SHORT_ID_START..SHORT_ID_END].copy_from_slice(&id);
        frame
    }

    fn crl_with_cert(hash_hex: &str) -> String {
        format!(r#"{{"revoked": [{{"certificate_hash": "{hash_hex}"}}]}}"#)
    }

    fn crl_with_short_id(id_hex: &str) -> String {
        format!(r#"{{"revoked": [{{"hashed_id": "{id_hex}"}}]}}"#)
    }

    #[test]
    fn zero_stats_interval_is_clamped_rather_than_panicking() {
        let dir = TempDir::new().unwrap();
        let crl_path = dir.path().join("crl.json");
        fs::write(&crl_path, r#"{"revoked": []}"#).unwrap();

        let mut store = RevocationStore::new(&crl_path, Duration::from_secs(3600));
        store.reload().unwrap();
        let audit = AuditLog::open(dir.path().join("audit.log")).unwrap();
        let mut filter = TrustFilter::new(
            store,
            BlacklistPolicy::default(),
            0,
            Arc::new(MetricsRecorder::new()),
            Arc::new(audit),
        );

        let frame = compact_frame([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(filter.process(&frame, SEC), Verdict::Accepted);
    }

    #[test]
    fn unsupported_sizes_are_malformed_and_mutate_nothing() {
        let mut h = Harness::new(r#"{"revoked": []}"#);

        for len in [10usize, 200, 355, 1000] {
            let frame = vec![0u8; len];
            assert_eq!(h.filter.process(&frame, SEC), Verdict::DroppedMalformed);
        }
        assert_eq!(h.filter.blacklisted_count(), 0);
        assert!(h.filter.associations.is_empty());
        assert_eq!(h.filter.stats.crl_drops, 0);
        assert_eq!(h.filter.stats.blacklist_drops, 0);
        assert_eq!(h.filter.stats.total, 4);
    }

    #[test]
    fn unrevoked_messages_are_accepted() {
        let mut h = Harness::new(r#"{"revoked": []}"#);

        let cert = full_cert_frame(0x11);
        let compact = compact_frame([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(h.filter.process(&cert, SEC), Verdict::Accepted);
        assert_eq!(h.filter.process(&compact, 2 * SEC), Verdict::Accepted);
        assert_eq!(h.filter.stats.accepted, 2);
    }

    #[test]
    fn full_certificate_sighting_records_association() {
        let mut h = Harness::new(r#"{"revoked": []}"#);
        let frame = full_cert_frame(0x22);
        h.filter.process(&frame, SEC);

        let digest = Sha256::digest(&frame[CERT_PAYLOAD_START..CERT_PAYLOAD_END]);
        let short = ShortId::from_hex(&hex::encode(&digest[24..])).unwrap();
        let stored = h.filter.associations.get(&short).unwrap();
        assert_eq!(stored.to_string(), cert_hash_hex(&frame));
    }

    #[test]
    fn revoked_certificate_records_violation_for_hash_and_short_id() {
        let frame = full_cert_frame(0x33);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        assert_eq!(h.filter.process(&frame, SEC), Verdict::DroppedRevoked);
        assert_eq!(h.filter.stats.crl_drops, 1);

        let cert_key = IdentityKey::Cert(CertHash::from_hex(&cert_hash_hex(&frame)).unwrap());
        let short_key = IdentityKey::Short(ShortId::from_hex(&short_id_hex(&frame)).unwrap());
        assert_eq!(h.filter.engine.violations_in_window(&cert_key, SEC), 1);
        assert_eq!(h.filter.engine.violations_in_window(&short_key, SEC), 1);
    }

    #[test]
    fn three_hits_in_window_blacklist_hash_and_short_id() {
        let frame = full_cert_frame(0x44);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        assert_eq!(h.filter.process(&frame, 0), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, 20 * SEC), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, 40 * SEC), Verdict::DroppedRevoked);

        // Both the fingerprint and its derived short id are now banned.
        assert_eq!(h.filter.blacklisted_count(), 2);

        // A fourth identical message hits the blacklist path, not the CRL
        // path, and records no further violation.
        assert_eq!(h.filter.process(&frame, 41 * SEC), Verdict::DroppedBlacklisted);
        assert_eq!(h.filter.stats.crl_drops, 3);
        assert_eq!(h.filter.stats.blacklist_drops, 1);

        let cert_key = IdentityKey::Cert(CertHash::from_hex(&cert_hash_hex(&frame)).unwrap());
        assert_eq!(
            h.filter.engine.violations_in_window(&cert_key, 41 * SEC),
            3
        );
    }

    #[test]
    fn hits_spread_beyond_window_do_not_blacklist() {
        let frame = full_cert_frame(0x55);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        assert_eq!(h.filter.process(&frame, 0), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, 45 * SEC), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, 90 * SEC), Verdict::DroppedRevoked);
        assert_eq!(h.filter.blacklisted_count(), 0);
    }

    #[test]
    fn blacklisted_compact_id_is_dropped_via_certificate_link() {
        let cert = full_cert_frame(0x66);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&cert)));

        h.filter.process(&cert, 0);
        h.filter.process(&cert, SEC);
        h.filter.process(&cert, 2 * SEC);
        assert_eq!(h.filter.blacklisted_count(), 2);

        // A compact message carrying the derived short id is banned too.
        let digest = Sha256::digest(&cert[CERT_PAYLOAD_START..CERT_PAYLOAD_END]);
        let mut id = [0u8; 8];
        id.copy_from_slice(&digest[24..]);
        assert_eq!(
            h.filter.process(&compact_frame(id), 3 * SEC),
            Verdict::DroppedBlacklisted
        );
    }

    #[test]
    fn blacklist_expiry_is_not_extended_and_evaluation_restarts_fresh() {
        let frame = full_cert_frame(0x77);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        h.filter.process(&frame, 0);
        h.filter.process(&frame, SEC);
        h.filter.process(&frame, 2 * SEC);
        let expiry = 2 * SEC + 300 * SEC;

        // Repeated hits while banned do not move the expiry.
        assert_eq!(h.filter.process(&frame, 10 * SEC), Verdict::DroppedBlacklisted);
        assert_eq!(
            h.filter.process(&frame, expiry - SEC),
            Verdict::DroppedBlacklisted
        );

        // Past the expiry the ban lapses and counting restarts from zero:
        // a still-revoked message is a CRL drop again, not a blacklist one.
        assert_eq!(h.filter.process(&frame, expiry), Verdict::DroppedRevoked);
        assert_eq!(h.filter.blacklisted_count(), 0);
        let cert_key = IdentityKey::Cert(CertHash::from_hex(&cert_hash_hex(&frame)).unwrap());
        assert_eq!(h.filter.engine.violations_in_window(&cert_key, expiry), 1);
    }

    #[test]
    fn expired_key_with_clean_crl_is_accepted() {
        let frame = full_cert_frame(0x88);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        h.filter.process(&frame, 0);
        h.filter.process(&frame, SEC);
        h.filter.process(&frame, 2 * SEC);

        h.rewrite_crl(r#"{"revoked": []}"#);
        let expiry = 2 * SEC + 300 * SEC;
        assert_eq!(h.filter.process(&frame, expiry), Verdict::Accepted);
    }

    #[test]
    fn reloading_an_empty_crl_unrevokes_immediately() {
        let frame = full_cert_frame(0x99);
        let mut h = Harness::new(&crl_with_cert(&cert_hash_hex(&frame)));

        assert_eq!(h.filter.process(&frame, 0), Verdict::DroppedRevoked);
        h.rewrite_crl(r#"{"revoked": []}"#);
        assert_eq!(h.filter.process(&frame, SEC), Verdict::Accepted);
    }

    #[test]
    fn revoked_compact_id_escalates_on_its_own() {
        let id = [9u8, 9, 9, 9, 9, 9, 9, 9];
        let mut h = Harness::new(&crl_with_short_id(&hex::encode(id)));
        let frame = compact_frame(id);

        assert_eq!(h.filter.process(&frame, 0), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, SEC), Verdict::DroppedRevoked);
        assert_eq!(h.filter.process(&frame, 2 * SEC), Verdict::DroppedRevoked);

        // Only the short id itself is banned; there is no related key.
        assert_eq!(h.filter.blacklisted_count(), 1);
        assert_eq!(h.filter.process(&frame, 3 * SEC), Verdict::DroppedBlacklisted);
    }
}
