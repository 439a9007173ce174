//! Logical schema of the CRL file.
//!
//! ```json
//! {
//!   "revoked": [
//!     { "certificate_hash": "<64 hex chars>", "hashed_id": "<16 hex chars>" }
//!   ]
//! }
//! ```
//!
//! Either field may be absent or empty; an entry carrying neither
//! contributes nothing to the revocation sets.

use serde::Deserialize;

/// Top-level CRL document.
#[derive(Debug, Default, Deserialize)]
pub struct CrlFile {
    #[serde(default)]
    pub revoked: Vec<CrlEntry>,
}

/// One revocation entry. Fields are hex strings as published by the CA
/// tooling; decoding happens in the store so a bad entry can be skipped
/// without aborting the load.
#[derive(Debug, Default, Deserialize)]
pub struct CrlEntry {
    #[serde(default)]
    pub certificate_hash: Option<String>,
    #[serde(default)]
    pub hashed_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let file: CrlFile = serde_json::from_str(r#"{"revoked": []}"#).unwrap();
        assert!(file.revoked.is_empty());
    }

    #[test]
    fn missing_fields_default_to_none() {
        let file: CrlFile = serde_json::from_str(r#"{"revoked": [{}]}"#).unwrap();
        assert!(file.revoked[0].certificate_hash.is_none());
        assert!(file.revoked[0].hashed_id.is_none());
    }
}
