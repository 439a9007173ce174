//! ## grindvakt-identity::classify
//! Size-class dispatch for captured safety messages. Only two frame sizes
//! are trusted traffic: 356-byte messages carrying a full certificate and
//! 192-byte messages carrying a bare compact identifier. Everything else is
//! malformed and must never reach the enforcement tables.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::id::{CertHash, ShortId};

/// Total length of a message carrying a full certificate.
pub const FULL_CERT_MSG_LEN: usize = 356;
/// Certificate payload byte range inside a 356-byte message.
pub const CERT_PAYLOAD_START: usize = 23;
pub const CERT_PAYLOAD_END: usize = 194;

/// Total length of a message carrying a bare compact identifier.
pub const COMPACT_MSG_LEN: usize = 192;
/// Identifier byte range inside a 192-byte message.
pub const SHORT_ID_START: usize = 22;
pub const SHORT_ID_END: usize = 30;

/// Errors for frames that do not match a supported size class. These drop
/// the frame with a warning and mutate no state.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ClassifyError {
    #[error("Unsupported packet size: {0} bytes")]
    UnsupportedSize(usize),
    #[error("Frame truncated: need {needed} bytes, got {len}")]
    Truncated { needed: usize, len: usize },
}

/// Classified identity of a captured message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identity {
    /// 356-byte message: fingerprint of bytes [23, 194) plus the derived
    /// compact identifier (last 8 bytes of the fingerprint).
    FullCertificate { full_hash: CertHash, short_id: ShortId },
    /// 192-byte message: identifier taken verbatim from bytes [22, 30).
    CompactId { id: ShortId },
}

impl Identity {
    /// Key the enforcement tables track this message under.
    pub fn primary_key(&self) -> crate::id::IdentityKey {
        match self {
            Identity::FullCertificate { full_hash, .. } => {
                crate::id::IdentityKey::Cert(*full_hash)
            }
            Identity::CompactId { id } => crate::id::IdentityKey::Short(*id),
        }
    }
}

/// Classifies a raw frame by size and derives its identifier(s) from the
/// fixed byte ranges.
pub fn classify(frame: &[u8]) -> Result<Identity, ClassifyError> {
    match frame.len() {
        FULL_CERT_MSG_LEN => {
            if frame.len() < CERT_PAYLOAD_END {
                return Err(ClassifyError::Truncated {
                    needed: CERT_PAYLOAD_END,
                    len: frame.len(),
                });
            }
            let digest = Sha256::digest(&frame[CERT_PAYLOAD_START..CERT_PAYLOAD_END]);
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&digest);
            let full_hash = CertHash::new(bytes);
            Ok(Identity::FullCertificate {
                full_hash,
                short_id: full_hash.short_id(),
            })
        }
        COMPACT_MSG_LEN => {
            if frame.len() < SHORT_ID_END {
                return Err(ClassifyError::Truncated {
                    needed: SHORT_ID_END,
                    len: frame.len(),
                });
            }
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&frame[SHORT_ID_START..SHORT_ID_END]);
            Ok(Identity::CompactId {
                id: ShortId::new(bytes),
            })
        }
        other => Err(ClassifyError::UnsupportedSize(other)),
    }
}
