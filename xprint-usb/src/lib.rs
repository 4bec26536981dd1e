//! # xprint-usb
//!
//! USB receipt printer access - discovery, connection and ESC/POS formatting.
//!
//! ## Scope
//!
//! This crate handles HOW to reach and drive a printer:
//! - Walking the attached USB devices and picking the printer
//! - Opening a session on the chosen device (rusb)
//! - ESC/POS command bytes for alignment, emphasis and cutting
//! - Reducing text to what the printer can render (7-bit ASCII)
//!
//! Request handling (WHEN to print) stays in application code:
//! - HTTP endpoint and job dispatch → xprint-server
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use xprint_usb::{KnownVendorSet, PrintJobRequest, RusbBus, connect, find_candidate, format};
//!
//! let bus = RusbBus::new();
//! let vendors = KnownVendorSet::default();
//!
//! if let Some(device) = find_candidate(&bus, &vendors) {
//!     let mut session = connect(&bus, &device, Duration::from_millis(5000))?;
//!     let request = PrintJobRequest::new("Hello").bold(true).align("center");
//!     format::apply(&mut session, &request)?;
//! }
//! ```

mod bus;
mod discovery;
mod encoding;
mod error;
mod escpos;
pub mod format;
mod usb;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-exports
pub use bus::{BusDeviceDescriptor, PrinterSession, UsbBus};
pub use discovery::{
    DEFAULT_BRAND, DEFAULT_VENDOR_IDS, KnownVendorSet, Probe, connect, find_candidate, probe,
};
pub use encoding::strip_non_ascii;
pub use error::{PrintError, PrintResult};
pub use escpos::{Alignment, EscPosBuilder};
pub use format::{PrintJobRequest, PrintOutcome};
pub use usb::{RusbBus, RusbSession};
