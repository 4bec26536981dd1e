//! Print service
//!
//! Async front of the dispatcher: moves the blocking USB pipeline onto
//! tokio's blocking pool and, when enabled, holds the device lock for the
//! whole job.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use xprint_usb::{PrintJobRequest, PrintOutcome, UsbBus};

use super::dispatcher::{DispatchError, PrintDispatcher};

#[derive(Debug, thiserror::Error)]
pub enum PrintServiceError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Print task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type PrintServiceResult<T> = Result<T, PrintServiceError>;

/// Print service
///
/// With `device_lock` set, concurrent jobs queue on the lock instead of
/// racing for the printer. Without it, a second job that reaches the
/// device while it is claimed fails with a connection error.
pub struct PrintService<B> {
    dispatcher: Arc<PrintDispatcher<B>>,
    device_lock: Option<Arc<Mutex<()>>>,
}

impl<B> PrintService<B>
where
    B: UsbBus + Send + Sync + 'static,
{
    pub fn new(dispatcher: PrintDispatcher<B>, serialize: bool) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            device_lock: serialize.then(|| Arc::new(Mutex::new(()))),
        }
    }

    /// Run one job to completion
    pub async fn print(&self, request: PrintJobRequest) -> PrintServiceResult<PrintOutcome> {
        let guard = match &self.device_lock {
            Some(lock) => {
                debug!("Waiting for device lock");
                Some(lock.clone().lock_owned().await)
            }
            None => None,
        };

        // The blocking task owns the guard: the lock stays held until the
        // USB job ends, even if the request future is dropped first.
        let dispatcher = self.dispatcher.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            dispatcher.dispatch(&request)
        })
        .await??;

        Ok(outcome)
    }
}
