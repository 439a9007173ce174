//! ## grindvakt-telemetry
//! **Two reporting channels plus Prometheus counters**
//!
//! ### Components:
//! - `logging`: tracing subscriber setup for the live operator console
//! - `audit`: durable file log receiving every drop and blacklist transition
//! - `metrics`: Prometheus registry with the filter's aggregate counters
//!
//! The two channels are deliberately asymmetric: blacklisted-drop events go
//! to the audit file only, so a banned repeat offender cannot flood the
//! operator view.

pub mod audit;
pub mod logging;
pub mod metrics;

pub use audit::AuditLog;
pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
