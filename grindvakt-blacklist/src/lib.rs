//! ## grindvakt-blacklist
//! **Sliding-window violation accounting and temporary blacklisting**
//!
//! ### Expectations:
//! - Violations count only within the trailing window; older events never
//!   contribute to a promotion
//! - Blacklist entries are monotonic for their duration: re-triggering
//!   while banned neither resets nor extends the expiry
//! - A certificate promotion can drag its derived short id into the ban
//!   with the same expiry (one violation, two entries)
//!
//! All timestamps are explicit `u64` Unix milliseconds supplied by the
//! caller, so the engine is deterministic under test.

use std::collections::HashMap;
use std::time::Duration;

use grindvakt_identity::IdentityKey;

/// Fixed policy constants for escalation.
#[derive(Clone, Copy, Debug)]
pub struct BlacklistPolicy {
    /// Violations within the window required to blacklist.
    pub violation_threshold: u32,
    /// Trailing window over which violations are counted.
    pub violation_window: Duration,
    /// How long a blacklist entry lasts.
    pub blacklist_duration: Duration,
}

impl Default for BlacklistPolicy {
    fn default() -> Self {
        Self {
            violation_threshold: 3,
            violation_window: Duration::from_secs(60),
            blacklist_duration: Duration::from_secs(300),
        }
    }
}

/// Why a key was just blacklisted; carried back to the caller for auditing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromotionReason {
    /// The key itself crossed the violation threshold.
    RepeatedViolations { count: u32, window_secs: u64 },
    /// The key was cross-linked to a certificate that crossed the threshold.
    LinkedTo(IdentityKey),
}

/// A blacklist insertion produced by [`BlacklistEngine::record_violation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Promotion {
    pub key: IdentityKey,
    pub expiry_ms: u64,
    pub reason: PromotionReason,
}

/// Tracks recent CRL violations per identifier and promotes repeat
/// offenders to a time-bounded blacklist. State is in-memory only; nothing
/// survives a restart.
pub struct BlacklistEngine {
    policy: BlacklistPolicy,
    violations: HashMap<IdentityKey, Vec<u64>>,
    blacklist: HashMap<IdentityKey, u64>,
}

impl BlacklistEngine {
    pub fn new(policy: BlacklistPolicy) -> Self {
        Self {
            policy,
            violations: HashMap::new(),
            blacklist: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &BlacklistPolicy {
        &self.policy
    }

    /// True iff the key is present and its ban has not expired yet.
    pub fn is_blacklisted(&self, key: &IdentityKey, now_ms: u64) -> bool {
        self.blacklist.get(key).is_some_and(|expiry| now_ms < *expiry)
    }

    /// Number of identifiers currently banned (including not-yet-swept
    /// expired entries, which the per-message sweep removes promptly).
    pub fn blacklisted_count(&self) -> usize {
        self.blacklist.len()
    }

    /// Violations recorded for `key` within the trailing window ending at
    /// `now_ms`.
    pub fn violations_in_window(&self, key: &IdentityKey, now_ms: u64) -> u32 {
        let cutoff = now_ms.saturating_sub(self.window_ms());
        self.violations
            .get(key)
            .map_or(0, |log| log.iter().filter(|ts| **ts >= cutoff).count() as u32)
    }

    /// Appends a violation timestamp for `key` (and for `related`, so a
    /// certificate's derived short id accrues the same history), prunes the
    /// window, and promotes the key to the blacklist once the threshold is
    /// reached. A promoted certificate also bans its related short id with
    /// the same expiry. Keys already banned are never re-promoted.
    pub fn record_violation(
        &mut self,
        key: IdentityKey,
        related: Option<IdentityKey>,
        now_ms: u64,
    ) -> Vec<Promotion> {
        let cutoff = now_ms.saturating_sub(self.window_ms());

        let log = self.violations.entry(key).or_default();
        log.push(now_ms);
        log.retain(|ts| *ts >= cutoff);
        let recent = log.len() as u32;

        if let Some(related_key) = related {
            let related_log = self.violations.entry(related_key).or_default();
            related_log.push(now_ms);
            related_log.retain(|ts| *ts >= cutoff);
        }

        let mut promotions = Vec::new();
        if recent >= self.policy.violation_threshold && !self.blacklist.contains_key(&key) {
            let expiry_ms = now_ms + self.policy.blacklist_duration.as_millis() as u64;
            self.blacklist.insert(key, expiry_ms);
            promotions.push(Promotion {
                key,
                expiry_ms,
                reason: PromotionReason::RepeatedViolations {
                    count: recent,
                    window_secs: self.policy.violation_window.as_secs(),
                },
            });

            if let Some(related_key) = related {
                if !self.blacklist.contains_key(&related_key) {
                    self.blacklist.insert(related_key, expiry_ms);
                    promotions.push(Promotion {
                        key: related_key,
                        expiry_ms,
                        reason: PromotionReason::LinkedTo(key),
                    });
                }
            }
        }
        promotions
    }

    /// Removes expired blacklist entries and stale violation history.
    /// Returns the keys whose ban just lapsed so the caller can audit the
    /// transition. Invoked once per message cycle.
    pub fn sweep(&mut self, now_ms: u64) -> Vec<IdentityKey> {
        let cutoff = now_ms.saturating_sub(self.window_ms());
        self.violations.retain(|_, log| {
            log.retain(|ts| *ts >= cutoff);
            !log.is_empty()
        });

        let expired: Vec<IdentityKey> = self
            .blacklist
            .iter()
            .filter(|(_, expiry)| now_ms >= **expiry)
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            self.blacklist.remove(key);
        }
        expired
    }

    fn window_ms(&self) -> u64 {
        self.policy.violation_window.as_millis() as u64
    }
}
