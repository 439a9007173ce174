//! ## grindvakt-identity
//! **Wire constants and identifier types for V2X safety messages**
//!
//! ### Expectations:
//! - Bit-for-bit compatibility with the fixed ETSI-style frame layout
//! - Zero allocations on the classification path (hashing aside)
//! - Identifiers usable as map keys across every enforcement table
//!
//! ### Components:
//! - `id`: `CertHash`, `ShortId`, `IdentityKey`
//! - `classify`: size-class dispatch and byte-range extraction

pub mod classify;
pub mod id;

pub use classify::{classify, ClassifyError, Identity};
pub use id::{CertHash, IdentityKey, ParseIdError, ShortId};
