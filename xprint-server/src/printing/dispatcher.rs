//! Print job dispatcher
//!
//! Runs one job end to end: discover, connect, format, cut. Nothing is
//! cached between jobs, so a printer that was power-cycled, unplugged or
//! swapped is picked up on the next request.

use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument};
use xprint_usb::{
    KnownVendorSet, PrintError, PrintJobRequest, PrintOutcome, UsbBus, connect, find_candidate,
    format,
};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Printer not detected or inaccessible")]
    NoDevice,

    #[error("Printer {device} detected but could not be opened: {source}")]
    Connection {
        device: String,
        #[source]
        source: PrintError,
    },

    #[error("Print error: {0}")]
    Print(#[source] PrintError),
}

impl DispatchError {
    /// Stable classification for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoDevice => "no_device",
            Self::Connection { .. } => "connection_failed",
            Self::Print(_) => "print_failed",
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Print job dispatcher
///
/// Owns the bus and the identification policy; each call to
/// [`PrintDispatcher::dispatch`] opens at most one session and drops it
/// before returning.
#[derive(Debug)]
pub struct PrintDispatcher<B> {
    bus: B,
    vendors: KnownVendorSet,
    timeout: Duration,
}

impl<B: UsbBus> PrintDispatcher<B> {
    pub fn new(bus: B, vendors: KnownVendorSet, timeout: Duration) -> Self {
        Self {
            bus,
            vendors,
            timeout,
        }
    }

    /// Execute a print job
    ///
    /// Blocking: performs USB I/O on the calling thread.
    #[instrument(skip_all, fields(text_len = request.text.len()))]
    pub fn dispatch(&self, request: &PrintJobRequest) -> DispatchResult<PrintOutcome> {
        let Some(device) = find_candidate(&self.bus, &self.vendors) else {
            error!("No printer detected");
            return Err(DispatchError::NoDevice);
        };

        let mut session = connect(&self.bus, &device, self.timeout).map_err(|source| {
            error!(device = %device, error = %source, "Printer found but connection failed");
            DispatchError::Connection {
                device: device.to_string(),
                source,
            }
        })?;

        let outcome = format::apply(&mut session, request).map_err(|e| {
            error!(error = %e, "Print error");
            DispatchError::Print(e)
        })?;

        info!(cut = outcome.was_cut(), "Print job completed");
        Ok(outcome)
    }
}
