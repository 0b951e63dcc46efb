//! Backend and dispatch error types

use super::operation::Operation;

/// Failure inside a single render handler
///
/// Carried in the dispatch summary and logged as a warning; it never
/// propagates out of `dispatch`.
#[derive(Debug, Clone)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for BackendError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Error type for registry mutations
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// A backend with this name is already registered
    DuplicateBackend(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateBackend(name) => {
                write!(f, "backend already registered: {}", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Error type for dispatch in strict mode
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// An active backend does not implement the requested operation
    MissingOperation { backend: String, operation: Operation },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::MissingOperation { backend, operation } => {
                write!(
                    f,
                    "backend {} has no handler for operation {}",
                    backend, operation
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}
