//! API routes
//!
//! - [`health`] - liveness check
//! - [`print`] - print job submission

pub mod health;
pub mod print;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::trace::TraceLayer;
use xprint_usb::UsbBus;

use crate::core::ServerState;

/// Build the application router
pub fn router<B>(state: ServerState<B>) -> Router
where
    B: UsbBus + Send + Sync + 'static,
{
    Router::<ServerState<B>>::new()
        .merge(health::router::<ServerState<B>>())
        .merge(print::router::<B>())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
