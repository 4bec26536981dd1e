//! Print job formatting
//!
//! Turns a [`PrintJobRequest`] into session operations, always in the
//! same order: alignment, emphasis, text, cut. Style has to be set before
//! the text it applies to, and the cut comes last.

use crate::bus::PrinterSession;
use crate::encoding::strip_non_ascii;
use crate::error::PrintResult;
use crate::escpos::Alignment;
use serde::Deserialize;
use tracing::{instrument, warn};

fn default_align() -> String {
    "left".to_string()
}

/// A single print job as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrintJobRequest {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    /// Free-form on purpose: unknown values print left-aligned
    #[serde(default = "default_align")]
    pub align: String,
}

impl PrintJobRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            align: default_align(),
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn align(mut self, align: impl Into<String>) -> Self {
        self.align = align.into();
        self
    }

    pub fn alignment(&self) -> Alignment {
        Alignment::normalize(&self.align)
    }

    /// Text as it is sent to the printer: ASCII only, newline terminated
    pub fn printable_text(&self) -> String {
        let mut text = strip_non_ascii(&self.text);
        text.push('\n');
        text
    }
}

/// Successful end states of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    Printed,
    /// Everything printed but the paper could not be cut
    PrintedWithoutCut { reason: String },
}

impl PrintOutcome {
    pub fn was_cut(&self) -> bool {
        matches!(self, Self::Printed)
    }
}

/// Run the formatting sequence against an open session
///
/// Errors from alignment, emphasis or text abort the job. A failed cut
/// is only logged.
#[instrument(skip_all, fields(bold = request.bold, align = %request.align))]
pub fn apply<S: PrinterSession>(
    session: &mut S,
    request: &PrintJobRequest,
) -> PrintResult<PrintOutcome> {
    session.set_align(request.alignment())?;
    session.set_bold(request.bold)?;
    session.text(&request.printable_text())?;

    match session.cut() {
        Ok(()) => Ok(PrintOutcome::Printed),
        Err(e) => {
            warn!(error = %e, "Paper cut not supported");
            Ok(PrintOutcome::PrintedWithoutCut {
                reason: e.to_string(),
            })
        }
    }
}
