//! Control surface errors.

use poe_hardware::HardwareError;

pub type Result<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute {0} is read-only")]
    ReadOnly(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

impl SurfaceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the request was rejected for its content rather than failing
    /// in the hardware layer.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::UnknownAttribute(_)
                | Self::ReadOnly(_)
                | Self::InvalidArgument(_)
                | Self::Hardware(HardwareError::InvalidArgument { .. })
        )
    }
}
