//! Shared handler state

use std::sync::Arc;
use xprint_usb::{RusbBus, UsbBus};

use crate::core::Config;
use crate::printing::{PrintDispatcher, PrintService};

/// Server state
///
/// Cheap to clone; handlers receive a copy per request. No printer handle
/// is kept here: every job discovers the device again.
pub struct ServerState<B = RusbBus> {
    pub config: Arc<Config>,
    pub print_service: Arc<PrintService<B>>,
}

impl<B> Clone for ServerState<B> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            print_service: self.print_service.clone(),
        }
    }
}

impl ServerState<RusbBus> {
    /// State backed by the host USB bus
    pub fn new(config: Config) -> Self {
        Self::with_bus(config, RusbBus::new())
    }
}

impl<B> ServerState<B>
where
    B: UsbBus + Send + Sync + 'static,
{
    /// State backed by an arbitrary bus implementation
    pub fn with_bus(config: Config, bus: B) -> Self {
        let dispatcher = PrintDispatcher::new(bus, config.known_vendors(), config.usb_timeout());
        let print_service = PrintService::new(dispatcher, config.serialize_print_jobs);

        Self {
            config: Arc::new(config),
            print_service: Arc::new(print_service),
        }
    }
}
