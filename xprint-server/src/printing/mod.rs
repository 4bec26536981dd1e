//! Receipt printing
//!
//! - [`dispatcher`]: the discover → connect → format pipeline for one job
//! - [`service`]: async wrapper with optional device serialization

pub mod dispatcher;
pub mod service;

pub use dispatcher::{DispatchError, DispatchResult, PrintDispatcher};
pub use service::{PrintService, PrintServiceError, PrintServiceResult};
