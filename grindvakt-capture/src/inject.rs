//! Packet injection on the trusted-side interface.

use pcap::{Active, Capture, Device};

use crate::capture::CaptureError;

/// Writes accepted frames, unmodified, onto the egress interface.
pub struct Injector {
    cap: Capture<Active>,
}

impl Injector {
    pub fn open(interface: &str) -> Result<Self, CaptureError> {
        let device = Device::list()?
            .into_iter()
            .find(|d| d.name == interface)
            .ok_or_else(|| CaptureError::DeviceNotFound(interface.to_string()))?;
        let cap = Capture::from_device(device)?.open()?;
        Ok(Self { cap })
    }

    /// Sends one frame. Failures are reported to the caller, which logs
    /// them and moves on; there is no retry or re-queue.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), CaptureError> {
        self.cap.sendpacket(frame)?;
        Ok(())
    }
}
