//! Bus and session abstractions
//!
//! The discovery and formatting code only talks to these traits, so the
//! rusb backend and the in-memory mock are interchangeable.

use crate::error::PrintResult;
use crate::escpos::Alignment;
use std::fmt;
use std::time::Duration;

/// Snapshot of one attached device, taken during a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDeviceDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: u8,
    pub address: u8,
    /// Only populated when it was read to decide the match
    pub manufacturer: Option<String>,
}

impl fmt::Display for BusDeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:04x} (bus {:03} address {:03})",
            self.vendor_id, self.product_id, self.bus, self.address
        )
    }
}

/// A host's view of the attached USB devices
pub trait UsbBus {
    /// Handle to one attached device, valid for the current scan
    type Device;

    /// Session type produced by [`UsbBus::open`]
    type Session: PrinterSession;

    /// Query the currently attached devices in system order
    fn devices(&self) -> PrintResult<Vec<Self::Device>>;

    /// Read ids and location of a device
    fn describe(&self, device: &Self::Device) -> PrintResult<BusDeviceDescriptor>;

    /// Read the manufacturer string of a device
    ///
    /// Usually requires opening the device, so it may fail on permissions
    /// even when [`UsbBus::describe`] succeeded.
    fn manufacturer(&self, device: &Self::Device) -> PrintResult<Option<String>>;

    /// Open a control session on the device matching the descriptor
    fn open(&self, descriptor: &BusDeviceDescriptor, timeout: Duration)
    -> PrintResult<Self::Session>;
}

/// Control channel to one printer, scoped to a single job
pub trait PrinterSession {
    fn set_align(&mut self, align: Alignment) -> PrintResult<()>;

    fn set_bold(&mut self, on: bool) -> PrintResult<()>;

    /// Emit text as-is; callers are expected to have normalized it
    fn text(&mut self, text: &str) -> PrintResult<()>;

    fn cut(&mut self) -> PrintResult<()>;
}
