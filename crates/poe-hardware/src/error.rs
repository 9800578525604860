//! Error types for hardware operations.
//!
//! Only two things can go wrong in the power controller: a GPIO line cannot be
//! acquired at start-up, or a caller passes an argument the register model
//! rejects. Writes to the shift register have no failure class because the
//! hardware offers no read-back or acknowledgment.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// A GPIO line could not be acquired from the platform.
    #[error("GPIO{line} ({label}) unavailable: {reason}")]
    ResourceUnavailable {
        line: u32,
        label: String,
        reason: String,
    },

    /// Argument rejected before any hardware was touched.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl HardwareError {
    /// Create a new resource unavailable error.
    pub fn resource_unavailable(
        line: u32,
        label: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ResourceUnavailable {
            line,
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<poe_core::Error> for HardwareError {
    fn from(error: poe_core::Error) -> Self {
        Self::invalid_argument(error.to_string())
    }
}
