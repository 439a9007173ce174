//! ## grindvakt-capture
//! **Thin pcap collaborator: one ingress loop, one egress injector**
//!
//! The core never touches pcap types directly; it consumes `Packet` byte
//! buffers in arrival order and hands accepted frames back unmodified for
//! injection on the trusted-side interface.

pub mod capture;
pub mod inject;
pub mod packet;

pub use capture::{run_capture_loop, CaptureError};
pub use inject::Injector;
pub use packet::Packet;
