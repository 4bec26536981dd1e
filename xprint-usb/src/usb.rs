//! rusb backend
//!
//! Talks to real hardware through libusb. The printer is driven over the
//! first bulk OUT endpoint of interface 0, which is how USB receipt
//! printers of this class expose their ESC/POS channel.

use crate::bus::{BusDeviceDescriptor, PrinterSession, UsbBus};
use crate::error::{PrintError, PrintResult};
use crate::escpos::{Alignment, EscPosBuilder};
use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Printer class interface claimed for the session
const PRINTER_INTERFACE: u8 = 0;

/// Used when the configuration descriptor has no bulk OUT endpoint
const FALLBACK_OUT_ENDPOINT: u8 = 0x01;

/// Lines fed before the cutter engages
const CUT_FEED_LINES: u8 = 3;

fn bus_error(context: &str, e: rusb::Error) -> PrintError {
    match e {
        rusb::Error::Timeout => PrintError::Timeout(context.to_string()),
        other => PrintError::Bus(format!("{}: {}", context, other)),
    }
}

/// Host USB bus via libusb's global context
#[derive(Debug, Clone)]
pub struct RusbBus {
    probe_timeout: Duration,
}

impl RusbBus {
    pub fn new() -> Self {
        Self {
            probe_timeout: Duration::from_millis(200),
        }
    }
}

impl Default for RusbBus {
    fn default() -> Self {
        Self::new()
    }
}

impl UsbBus for RusbBus {
    type Device = Device<GlobalContext>;
    type Session = RusbSession;

    fn devices(&self) -> PrintResult<Vec<Self::Device>> {
        let list = rusb::devices().map_err(|e| bus_error("list devices", e))?;
        Ok(list.iter().collect())
    }

    fn describe(&self, device: &Self::Device) -> PrintResult<BusDeviceDescriptor> {
        let desc = device
            .device_descriptor()
            .map_err(|e| bus_error("read device descriptor", e))?;

        Ok(BusDeviceDescriptor {
            vendor_id: desc.vendor_id(),
            product_id: desc.product_id(),
            bus: device.bus_number(),
            address: device.address(),
            manufacturer: None,
        })
    }

    fn manufacturer(&self, device: &Self::Device) -> PrintResult<Option<String>> {
        let desc = device
            .device_descriptor()
            .map_err(|e| bus_error("read device descriptor", e))?;

        if desc.manufacturer_string_index().is_none() {
            return Ok(None);
        }

        let handle = device.open().map_err(|e| bus_error("open for probing", e))?;
        let languages = handle
            .read_languages(self.probe_timeout)
            .map_err(|e| bus_error("read languages", e))?;

        let Some(language) = languages.first().copied() else {
            return Ok(None);
        };

        handle
            .read_manufacturer_string(language, &desc, self.probe_timeout)
            .map(Some)
            .map_err(|e| bus_error("read manufacturer", e))
    }

    fn open(
        &self,
        descriptor: &BusDeviceDescriptor,
        timeout: Duration,
    ) -> PrintResult<RusbSession> {
        RusbSession::open(descriptor, timeout)
    }
}

/// Claimed printer interface with its bulk OUT endpoint
pub struct RusbSession {
    handle: DeviceHandle<GlobalContext>,
    endpoint: u8,
    timeout: Duration,
}

impl RusbSession {
    /// Open the device identified by vendor/product id
    ///
    /// When several devices share the ids, the one at the descriptor's
    /// bus location is preferred.
    #[instrument(skip_all, fields(device = %descriptor))]
    pub fn open(descriptor: &BusDeviceDescriptor, timeout: Duration) -> PrintResult<Self> {
        let device = Self::locate(descriptor)?;

        let handle = device
            .open()
            .map_err(|e| PrintError::Connection(format!("{}: {}", descriptor, e)))?;

        // Linux usblp grabs printer interfaces; other platforms report NotSupported.
        match handle.set_auto_detach_kernel_driver(true) {
            Ok(()) | Err(rusb::Error::NotSupported) => {}
            Err(e) => warn!(error = %e, "Kernel driver auto-detach unavailable"),
        }

        handle
            .claim_interface(PRINTER_INTERFACE)
            .map_err(|e| PrintError::Connection(format!("claim interface: {}", e)))?;

        let endpoint = Self::bulk_out_endpoint(&device).unwrap_or_else(|| {
            debug!("No bulk OUT endpoint advertised, using {:#04x}", FALLBACK_OUT_ENDPOINT);
            FALLBACK_OUT_ENDPOINT
        });

        info!(endpoint = format_args!("{:#04x}", endpoint), "USB session opened");

        Ok(Self {
            handle,
            endpoint,
            timeout,
        })
    }

    fn locate(descriptor: &BusDeviceDescriptor) -> PrintResult<Device<GlobalContext>> {
        let list = rusb::devices()
            .map_err(|e| PrintError::Connection(format!("list devices: {}", e)))?;

        let mut fallback = None;
        for device in list.iter() {
            let Ok(desc) = device.device_descriptor() else {
                continue;
            };
            if desc.vendor_id() != descriptor.vendor_id || desc.product_id() != descriptor.product_id {
                continue;
            }
            if device.bus_number() == descriptor.bus && device.address() == descriptor.address {
                return Ok(device);
            }
            if fallback.is_none() {
                fallback = Some(device);
            }
        }

        fallback.ok_or_else(|| PrintError::Connection(format!("{} is no longer attached", descriptor)))
    }

    fn bulk_out_endpoint(device: &Device<GlobalContext>) -> Option<u8> {
        let config = device.active_config_descriptor().ok()?;
        config
            .interfaces()
            .filter(|interface| interface.number() == PRINTER_INTERFACE)
            .flat_map(|interface| interface.descriptors())
            .flat_map(|setting| {
                setting
                    .endpoint_descriptors()
                    .filter(|ep| {
                        ep.direction() == Direction::Out && ep.transfer_type() == TransferType::Bulk
                    })
                    .map(|ep| ep.address())
                    .collect::<Vec<_>>()
            })
            .next()
    }

    fn send(&mut self, builder: EscPosBuilder) -> PrintResult<()> {
        let data = builder.build();
        let written = self
            .handle
            .write_bulk(self.endpoint, &data, self.timeout)
            .map_err(|e| match e {
                rusb::Error::Timeout => {
                    PrintError::Timeout(format!("write after {} ms", self.timeout.as_millis()))
                }
                rusb::Error::NotSupported => PrintError::Unsupported(e.to_string()),
                other => PrintError::Write(other.to_string()),
            })?;

        if written != data.len() {
            return Err(PrintError::Write(format!(
                "short write: {} of {} bytes",
                written,
                data.len()
            )));
        }
        Ok(())
    }
}

impl PrinterSession for RusbSession {
    fn set_align(&mut self, align: Alignment) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.align(align);
        self.send(b)
    }

    fn set_bold(&mut self, on: bool) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.bold(on);
        self.send(b)
    }

    fn text(&mut self, text: &str) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.text(text);
        self.send(b)
    }

    fn cut(&mut self) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.cut_feed(CUT_FEED_LINES);
        self.send(b)
    }
}

impl Drop for RusbSession {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(PRINTER_INTERFACE) {
            debug!(error = %e, "Release interface failed");
        }
    }
}
