//! Crate-level error type

use crate::backend::DispatchError;
use crate::device::DeviceError;
use crate::node::RenderError;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
///
/// Device-selection failures are user-facing: they carry everything needed
/// for a diagnostic and terminate the current operation under control.
#[derive(Debug)]
pub enum Error {
    /// The requested device id does not exist
    DeviceNotFound { id: String, available: Vec<String> },
    /// The device exists but refused access
    AccessDenied { id: String, reason: String },
    /// Driver-level device failure
    Device(String),
    /// Dispatch failed (strict mode missing operation)
    Dispatch(DispatchError),
    /// Whole-tree rendering failed
    Render(RenderError),
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DeviceNotFound { id, available } => {
                if available.is_empty() {
                    write!(f, "device not found: {}", id)
                } else {
                    write!(
                        f,
                        "device not found: {} (available: {})",
                        id,
                        available.join(", ")
                    )
                }
            }
            Error::AccessDenied { id, reason } => {
                write!(f, "access denied for device {}: {}", id, reason)
            }
            Error::Device(msg) => write!(f, "device error: {}", msg),
            Error::Dispatch(err) => write!(f, "dispatch error: {}", err),
            Error::Render(err) => write!(f, "render error: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Dispatch(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DispatchError> for Error {
    fn from(err: DispatchError) -> Self {
        Error::Dispatch(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotFound { id } => Error::DeviceNotFound {
                id,
                available: Vec::new(),
            },
            DeviceError::AccessDenied { id, reason } => Error::AccessDenied { id, reason },
            DeviceError::Driver(msg) => Error::Device(msg),
        }
    }
}
