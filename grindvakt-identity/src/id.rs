//! Identifier types shared by the revocation store, the blacklist engine
//! and the audit trail.

use std::fmt;

use thiserror::Error;

/// Errors from decoding an identifier out of its hex representation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseIdError {
    #[error("Expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// SHA-256 fingerprint of a certificate payload (64 hex chars on the wire).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CertHash([u8; 32]);

impl CertHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Decodes a full fingerprint from its 64-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, ParseIdError> {
        if s.len() != 64 {
            return Err(ParseIdError::InvalidLength {
                expected: 64,
                actual: s.len(),
            });
        }
        let raw = hex::decode(s)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The derived compact identifier: last 8 bytes of the fingerprint.
    pub fn short_id(&self) -> ShortId {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[24..]);
        ShortId(bytes)
    }

    /// Abbreviated form for console output (first 16 hex chars).
    pub fn short_display(&self) -> String {
        format!("{}...", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for CertHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for CertHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertHash({self})")
    }
}

/// Compact identifier: carried directly in 192-byte messages, or derived by
/// truncating a full fingerprint. The two origins are logically comparable
/// and may collide across unrelated vehicles (accepted risk).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortId([u8; 8]);

impl ShortId {
    pub fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Decodes a compact identifier from its 16-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, ParseIdError> {
        if s.len() != 16 {
            return Err(ParseIdError::InvalidLength {
                expected: 16,
                actual: s.len(),
            });
        }
        let raw = hex::decode(s)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortId({self})")
    }
}

/// Key under which an identifier is tracked in the violation log and the
/// blacklist table. A certificate and its derived short id are distinct keys
/// that get cross-linked at escalation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Cert(CertHash),
    Short(ShortId),
}

impl IdentityKey {
    /// Audit-trail category label.
    pub fn category(&self) -> &'static str {
        match self {
            IdentityKey::Cert(_) => "Certificate",
            IdentityKey::Short(_) => "CompactId",
        }
    }

    /// Abbreviated identifier for console output.
    pub fn short_display(&self) -> String {
        match self {
            IdentityKey::Cert(hash) => hash.short_display(),
            IdentityKey::Short(id) => id.to_string(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Cert(hash) => hash.fmt(f),
            IdentityKey::Short(id) => id.fmt(f),
        }
    }
}
