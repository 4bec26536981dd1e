//! Print route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /print | POST | Print text on the attached receipt printer |
//!
//! # Request
//!
//! ```json
//! { "text": "Hello", "bold": true, "align": "center" }
//! ```
//!
//! `bold` defaults to `false`, `align` to `"left"`. Unknown alignments
//! print left-aligned. Non-ASCII characters are dropped from `text`.
//!
//! # Responses
//!
//! - `200 {"message": "Print successful"}`, plus `"cut": false` when the
//!   printer could not cut the paper
//! - `500 {"error": "no_device" | "connection_failed" | "print_failed", "message": ...}`

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use xprint_usb::{PrintJobRequest, PrintOutcome, UsbBus};

use crate::core::{Result, ServerState};

pub fn router<B>() -> Router<ServerState<B>>
where
    B: UsbBus + Send + Sync + 'static,
{
    Router::new().route("/print", post(print::<B>))
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cut: Option<bool>,
}

impl From<PrintOutcome> for PrintResponse {
    fn from(outcome: PrintOutcome) -> Self {
        Self {
            message: "Print successful",
            cut: (!outcome.was_cut()).then_some(false),
        }
    }
}

/// POST /print - print one job
pub async fn print<B>(
    State(state): State<ServerState<B>>,
    Json(request): Json<PrintJobRequest>,
) -> Result<Json<PrintResponse>>
where
    B: UsbBus + Send + Sync + 'static,
{
    let outcome = state.print_service.print(request).await?;
    Ok(Json(outcome.into()))
}
