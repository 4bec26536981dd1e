//! In-memory bus for tests
//!
//! [`MockBus`] plays back a fixed device list and records every call, so
//! tests can assert which devices were inspected, whether a session was
//! opened and which commands it received. Clones share the same journal.

use crate::bus::{BusDeviceDescriptor, PrinterSession, UsbBus};
use crate::error::{PrintError, PrintResult};
use crate::escpos::Alignment;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One device as the mock bus reports it
#[derive(Debug, Clone)]
pub struct MockDevice {
    vendor_id: u16,
    product_id: u16,
    bus: u8,
    address: Option<u8>,
    manufacturer: Result<Option<String>, String>,
    unreadable: Option<String>,
}

impl MockDevice {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            bus: 1,
            address: None,
            manufacturer: Ok(None),
            unreadable: None,
        }
    }

    /// A device whose descriptor cannot be read at all
    pub fn unreadable(reason: &str) -> Self {
        Self {
            unreadable: Some(reason.to_string()),
            ..Self::new(0, 0)
        }
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = Ok(Some(manufacturer.to_string()));
        self
    }

    /// Descriptor reads fine, manufacturer string does not
    pub fn manufacturer_error(mut self, reason: &str) -> Self {
        self.manufacturer = Err(reason.to_string());
        self
    }

    pub fn at(mut self, bus: u8, address: u8) -> Self {
        self.bus = bus;
        self.address = Some(address);
        self
    }
}

/// Session operation as recorded by [`MockSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOp {
    Align(Alignment),
    Bold(bool),
    Text(String),
    Cut,
}

/// Session step that can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStep {
    Align,
    Bold,
    Text,
    Cut,
}

#[derive(Debug, Default)]
struct Journal {
    describe_calls: usize,
    manufacturer_calls: usize,
    open_timeouts: Vec<Duration>,
    live_sessions: usize,
    peak_sessions: usize,
    ops: Vec<MockOp>,
}

/// Scripted [`UsbBus`] implementation
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    devices: Vec<MockDevice>,
    list_error: Option<String>,
    open_error: Option<PrintError>,
    step_failures: Vec<(MockStep, PrintError)>,
    step_delays: Vec<(MockStep, Duration)>,
    exclusive: bool,
    journal: Arc<Mutex<Journal>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a device; unplaced devices get address = position + 1
    pub fn with_device(mut self, mut device: MockDevice) -> Self {
        if device.address.is_none() {
            device.address = Some(u8::try_from(self.devices.len() + 1).unwrap_or(u8::MAX));
        }
        self.devices.push(device);
        self
    }

    /// Make the device list query itself fail
    pub fn fail_list(mut self, reason: &str) -> Self {
        self.list_error = Some(reason.to_string());
        self
    }

    pub fn fail_open(mut self, error: PrintError) -> Self {
        self.open_error = Some(error);
        self
    }

    pub fn fail_step(mut self, step: MockStep, error: PrintError) -> Self {
        self.step_failures.push((step, error));
        self
    }

    /// Block the calling thread for `delay` whenever `step` runs
    pub fn delay_step(mut self, step: MockStep, delay: Duration) -> Self {
        self.step_delays.push((step, delay));
        self
    }

    /// Refuse to open while another session is live, like a claimed interface
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    // === Journal ===

    pub fn describe_calls(&self) -> usize {
        self.lock_journal().describe_calls
    }

    pub fn manufacturer_calls(&self) -> usize {
        self.lock_journal().manufacturer_calls
    }

    /// Timeouts passed to every open attempt, successful or not
    pub fn open_timeouts(&self) -> Vec<Duration> {
        self.lock_journal().open_timeouts.clone()
    }

    pub fn open_attempts(&self) -> usize {
        self.lock_journal().open_timeouts.len()
    }

    /// Sessions opened and not yet dropped
    pub fn live_sessions(&self) -> usize {
        self.lock_journal().live_sessions
    }

    /// Highest number of sessions that were ever live at once
    pub fn peak_sessions(&self) -> usize {
        self.lock_journal().peak_sessions
    }

    /// Every operation received by any session, in order
    pub fn ops(&self) -> Vec<MockOp> {
        self.lock_journal().ops.clone()
    }

    fn lock_journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UsbBus for MockBus {
    type Device = MockDevice;
    type Session = MockSession;

    fn devices(&self) -> PrintResult<Vec<MockDevice>> {
        match &self.list_error {
            Some(reason) => Err(PrintError::Bus(reason.clone())),
            None => Ok(self.devices.clone()),
        }
    }

    fn describe(&self, device: &MockDevice) -> PrintResult<BusDeviceDescriptor> {
        self.lock_journal().describe_calls += 1;

        if let Some(reason) = &device.unreadable {
            return Err(PrintError::Bus(reason.clone()));
        }

        Ok(BusDeviceDescriptor {
            vendor_id: device.vendor_id,
            product_id: device.product_id,
            bus: device.bus,
            address: device.address.unwrap_or(0),
            manufacturer: None,
        })
    }

    fn manufacturer(&self, device: &MockDevice) -> PrintResult<Option<String>> {
        self.lock_journal().manufacturer_calls += 1;
        device.manufacturer.clone().map_err(PrintError::Bus)
    }

    fn open(&self, _descriptor: &BusDeviceDescriptor, timeout: Duration) -> PrintResult<MockSession> {
        let mut journal = self.lock_journal();
        journal.open_timeouts.push(timeout);

        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }
        if self.exclusive && journal.live_sessions > 0 {
            return Err(PrintError::Connection("Resource busy".into()));
        }

        journal.live_sessions += 1;
        journal.peak_sessions = journal.peak_sessions.max(journal.live_sessions);
        Ok(MockSession {
            step_failures: self.step_failures.clone(),
            step_delays: self.step_delays.clone(),
            journal: self.journal.clone(),
        })
    }
}

/// Recording [`PrinterSession`]
#[derive(Debug)]
pub struct MockSession {
    step_failures: Vec<(MockStep, PrintError)>,
    step_delays: Vec<(MockStep, Duration)>,
    journal: Arc<Mutex<Journal>>,
}

impl MockSession {
    fn record(&mut self, step: MockStep, op: MockOp) -> PrintResult<()> {
        if let Some((_, delay)) = self.step_delays.iter().find(|(s, _)| *s == step) {
            std::thread::sleep(*delay);
        }
        if let Some((_, error)) = self.step_failures.iter().find(|(s, _)| *s == step) {
            return Err(error.clone());
        }
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .ops
            .push(op);
        Ok(())
    }
}

impl PrinterSession for MockSession {
    fn set_align(&mut self, align: Alignment) -> PrintResult<()> {
        self.record(MockStep::Align, MockOp::Align(align))
    }

    fn set_bold(&mut self, on: bool) -> PrintResult<()> {
        self.record(MockStep::Bold, MockOp::Bold(on))
    }

    fn text(&mut self, text: &str) -> PrintResult<()> {
        self.record(MockStep::Text, MockOp::Text(text.to_string()))
    }

    fn cut(&mut self) -> PrintResult<()> {
        self.record(MockStep::Cut, MockOp::Cut)
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        let mut journal = self.journal.lock().unwrap_or_else(|e| e.into_inner());
        journal.live_sessions = journal.live_sessions.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_saturate_on_crowded_bus() {
        let bus = (0..300).fold(MockBus::new(), |bus, _| {
            bus.with_device(MockDevice::new(0x1d6b, 0x0002))
        });
        let devices = bus.devices().unwrap();

        assert_eq!(bus.describe(&devices[0]).unwrap().address, 1);
        assert_eq!(bus.describe(&devices[254]).unwrap().address, 255);
        assert_eq!(bus.describe(&devices[299]).unwrap().address, 255);
    }

    #[test]
    fn test_exclusive_bus_refuses_second_session() {
        let bus = MockBus::new().exclusive();
        let descriptor = BusDeviceDescriptor {
            vendor_id: 0x0483,
            product_id: 0x5743,
            bus: 1,
            address: 1,
            manufacturer: None,
        };
        let timeout = Duration::from_millis(5000);

        let first = bus.open(&descriptor, timeout).unwrap();
        assert!(matches!(bus.open(&descriptor, timeout), Err(PrintError::Connection(_))));

        drop(first);
        assert!(bus.open(&descriptor, timeout).is_ok());
        assert_eq!(bus.peak_sessions(), 1);
    }
}
