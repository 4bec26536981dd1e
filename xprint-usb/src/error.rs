//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Clone, Error)]
pub enum PrintError {
    /// Device list query or descriptor read failed
    #[error("USB bus error: {0}")]
    Bus(String),

    /// Device found but the session could not be opened or claimed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Transfer to the printer failed
    #[error("Write failed: {0}")]
    Write(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Printer rejected a command it does not implement
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
