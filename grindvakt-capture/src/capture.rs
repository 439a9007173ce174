//! Blocking capture loop over a live pcap handle.

use std::sync::atomic::{AtomicBool, Ordering};

use pcap::{Capture, Device};
use thiserror::Error;
use tracing::error;

use crate::packet::Packet;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture device '{0}' not found")]
    DeviceNotFound(String),
    #[error("pcap error: {0}")]
    Pcap(#[from] pcap::Error),
}

/// Runs a live capture loop on the specified interface, invoking `callback`
/// for every captured message in arrival order. Blocks until `terminate`
/// is set. The callback runs to completion before the next frame is read,
/// so no message overtakes another.
pub fn run_capture_loop<F>(
    interface: &str,
    buffer_size: usize,
    promiscuous: bool,
    terminate: &AtomicBool,
    mut callback: F,
) -> Result<(), CaptureError>
where
    F: FnMut(&Packet),
{
    let device = Device::list()?
        .into_iter()
        .find(|d| d.name == interface)
        .ok_or_else(|| CaptureError::DeviceNotFound(interface.to_string()))?;

    let mut cap = Capture::from_device(device)?
        .promisc(promiscuous)
        .snaplen(buffer_size as i32)
        .timeout(1000)
        .open()?;

    while !terminate.load(Ordering::Relaxed) {
        match cap.next_packet() {
            Ok(captured) => {
                let packet = Packet::new(captured.data.to_vec());
                callback(&packet);
            }
            Err(pcap::Error::TimeoutExpired) => {
                // No packet in this timeout window; re-check the flag.
                continue;
            }
            Err(e) => {
                error!("Error capturing packet: {e}");
                return Err(e.into());
            }
        }
    }
    Ok(())
}
