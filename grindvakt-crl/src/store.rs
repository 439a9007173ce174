//! ## grindvakt-crl::store
//! The revocation store sits inline on the packet path: `reload_if_due`
//! runs before each message, so a slow CRL source stalls processing for the
//! duration of the read. That trade-off is accepted over a background
//! refresh that could serve half-updated sets.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use grindvakt_identity::{CertHash, ShortId};

use crate::schema::CrlFile;

#[derive(Debug, Error)]
pub enum CrlError {
    #[error("CRL read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CRL parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Holds the two revocation sets and the reload cadence.
pub struct RevocationStore {
    path: PathBuf,
    reload_interval: Duration,
    last_load: Option<Instant>,
    revoked_cert_hashes: HashSet<CertHash>,
    revoked_short_ids: HashSet<ShortId>,
}

impl RevocationStore {
    pub fn new<P: AsRef<Path>>(path: P, reload_interval: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reload_interval,
            last_load: None,
            revoked_cert_hashes: HashSet::new(),
            revoked_short_ids: HashSet::new(),
        }
    }

    /// Re-parses the CRL file if the reload interval has elapsed (or no
    /// load has succeeded yet). On failure both sets are cleared and the
    /// cadence timer is left untouched, so the next message retries.
    pub fn reload_if_due(&mut self) {
        let due = self
            .last_load
            .map_or(true, |at| at.elapsed() > self.reload_interval);
        if !due {
            return;
        }
        if let Err(e) = self.reload() {
            warn!("Cannot load CRL file {}: {e}", self.path.display());
            self.revoked_cert_hashes.clear();
            self.revoked_short_ids.clear();
        }
    }

    /// Unconditional reload. Atomic with respect to lookups: the sets are
    /// only swapped once the whole file has parsed.
    pub fn reload(&mut self) -> Result<(), CrlError> {
        let text = fs::read_to_string(&self.path)?;
        let file: CrlFile = serde_json::from_str(&text)?;

        let mut cert_hashes = HashSet::new();
        let mut short_ids = HashSet::new();
        for entry in &file.revoked {
            if let Some(hex) = entry.certificate_hash.as_deref().filter(|s| !s.is_empty()) {
                match CertHash::from_hex(hex) {
                    Ok(hash) => {
                        cert_hashes.insert(hash);
                    }
                    Err(e) => warn!("Skipping malformed certificate_hash entry: {e}"),
                }
            }
            if let Some(hex) = entry.hashed_id.as_deref().filter(|s| !s.is_empty()) {
                match ShortId::from_hex(hex) {
                    Ok(id) => {
                        short_ids.insert(id);
                    }
                    Err(e) => warn!("Skipping malformed hashed_id entry: {e}"),
                }
            }
        }

        self.revoked_cert_hashes = cert_hashes;
        self.revoked_short_ids = short_ids;
        self.last_load = Some(Instant::now());
        info!(
            "CRL loaded: {} revoked certificate hashes, {} revoked short ids",
            self.revoked_cert_hashes.len(),
            self.revoked_short_ids.len()
        );
        Ok(())
    }

    pub fn is_certificate_revoked(&self, hash: &CertHash) -> bool {
        self.revoked_cert_hashes.contains(hash)
    }

    pub fn is_short_id_revoked(&self, id: &ShortId) -> bool {
        self.revoked_short_ids.contains(id)
    }

    pub fn revoked_certificate_count(&self) -> usize {
        self.revoked_cert_hashes.len()
    }

    pub fn revoked_short_id_count(&self) -> usize {
        self.revoked_short_ids.len()
    }
}
