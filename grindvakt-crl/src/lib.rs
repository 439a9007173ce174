//! ## grindvakt-crl
//! **Revocation store with periodic wholesale reloads**
//!
//! The CRL file is the authoritative snapshot: every successful reload
//! replaces both revocation sets completely, so enforcement state is always
//! a pure function of the last parse, never cumulative. A failed reload
//! clears both sets (fail-open) rather than freezing stale data.
//!
//! ### Components:
//! - `schema`: serde types for the JSON CRL file
//! - `store`: `RevocationStore` with reload cadence and pure lookups

pub mod schema;
pub mod store;

pub use schema::{CrlEntry, CrlFile};
pub use store::{CrlError, RevocationStore};
