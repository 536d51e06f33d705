//! Error types for the front panel.

use rollcall_hardware::HardwareError;
use rollcall_storage::StorageError;
use thiserror::Error;

/// Result type alias for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors surfaced by the panel controller.
///
/// Transaction-level problems (unknown identifier, clock fault, failed
/// append) are not errors: they become on-screen outcomes. What remains here
/// are peripheral failures and bad configuration.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Keypad, display or clock failure.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Directory or ledger failure outside a transaction.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid panel configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PanelError {
    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if the panel loop cannot continue.
    ///
    /// Only a disconnected peripheral ends the loop; every other failure is
    /// local to the current step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Hardware(e) if e.is_disconnected())
    }
}
