//! ## grindvakt-engine
//! **Per-message decision pipeline and runtime wiring**
//!
//! The pipeline sequences, for every captured message: CRL reload-if-due,
//! expiry sweep, classification, blacklist check, revocation check, then
//! accept-and-forward or drop. Processing is single-stream and
//! order-preserving: one message runs to completion before the next is
//! taken from the capture collaborator.

pub mod error;
pub mod filter;
pub mod runtime;

pub use error::EngineError;
pub use filter::{FilterStats, TrustFilter, Verdict};
pub use runtime::{run_live, run_replay};
