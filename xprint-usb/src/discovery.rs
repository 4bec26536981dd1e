//! Printer discovery and connection
//!
//! A printer is *found* from bus metadata alone and *connected* in a
//! separate step: a device can be visible without being claimable (for
//! example while another process holds it).

use crate::bus::{BusDeviceDescriptor, UsbBus};
use crate::error::{PrintError, PrintResult};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Vendor ids shipped by the Xprinter family and its OEM boards
pub const DEFAULT_VENDOR_IDS: [u16; 3] = [0x0483, 0x5740, 0x04B8];

/// Manufacturer substring identifying the family
pub const DEFAULT_BRAND: &str = "Xprinter";

/// Identification policy for the target printer family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownVendorSet {
    vendor_ids: Vec<u16>,
    brand: String,
}

impl KnownVendorSet {
    pub fn new(vendor_ids: impl Into<Vec<u16>>, brand: impl Into<String>) -> Self {
        Self {
            vendor_ids: vendor_ids.into(),
            brand: brand.into(),
        }
    }

    pub fn contains_vendor(&self, vendor_id: u16) -> bool {
        self.vendor_ids.contains(&vendor_id)
    }

    /// Case-sensitive literal substring match
    pub fn matches_manufacturer(&self, manufacturer: &str) -> bool {
        manufacturer.contains(&self.brand)
    }
}

impl Default for KnownVendorSet {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR_IDS, DEFAULT_BRAND)
    }
}

/// Result of inspecting a single device
#[derive(Debug)]
pub enum Probe {
    Matched(BusDeviceDescriptor),
    NoMatch,
    /// Metadata could not be read; the device is skipped
    Unreadable(PrintError),
}

/// Classify one device against the vendor set
///
/// The manufacturer string is only read when the vendor id alone does
/// not match, since reading it means opening the device.
pub fn probe<B: UsbBus>(bus: &B, device: &B::Device, vendors: &KnownVendorSet) -> Probe {
    let mut descriptor = match bus.describe(device) {
        Ok(d) => d,
        Err(e) => return Probe::Unreadable(e),
    };

    debug!(
        vendor_id = format_args!("{:#06x}", descriptor.vendor_id),
        product_id = format_args!("{:#06x}", descriptor.product_id),
        bus = descriptor.bus,
        address = descriptor.address,
        "Inspecting USB device"
    );

    if vendors.contains_vendor(descriptor.vendor_id) {
        return Probe::Matched(descriptor);
    }

    match bus.manufacturer(device) {
        Ok(Some(manufacturer)) if vendors.matches_manufacturer(&manufacturer) => {
            descriptor.manufacturer = Some(manufacturer);
            Probe::Matched(descriptor)
        }
        Ok(_) => Probe::NoMatch,
        Err(e) => Probe::Unreadable(e),
    }
}

/// Find the first attached device that looks like a target printer
///
/// Scans in system order and stops at the first match. Never fails:
/// unreadable devices are skipped and an unavailable device list counts
/// as "nothing found".
#[instrument(skip_all)]
pub fn find_candidate<B: UsbBus>(bus: &B, vendors: &KnownVendorSet) -> Option<BusDeviceDescriptor> {
    let devices = match bus.devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!(error = %e, "USB device list unavailable");
            return None;
        }
    };

    for device in &devices {
        match probe(bus, device, vendors) {
            Probe::Matched(descriptor) => {
                info!(
                    vendor_id = format_args!("{:#06x}", descriptor.vendor_id),
                    product_id = format_args!("{:#06x}", descriptor.product_id),
                    "Printer detected"
                );
                return Some(descriptor);
            }
            Probe::NoMatch => {}
            Probe::Unreadable(e) => {
                debug!(error = %e, "Skipping unreadable USB device");
            }
        }
    }

    None
}

/// Open a session on a discovered printer
#[instrument(skip_all, fields(device = %descriptor))]
pub fn connect<B: UsbBus>(
    bus: &B,
    descriptor: &BusDeviceDescriptor,
    timeout: Duration,
) -> PrintResult<B::Session> {
    bus.open(descriptor, timeout).map_err(|e| {
        warn!(
            error = %e,
            "USB connection to {:#06x}:{:#06x} failed",
            descriptor.vendor_id,
            descriptor.product_id
        );
        match e {
            PrintError::Connection(_) => e,
            other => PrintError::Connection(other.to_string()),
        }
    })
}
