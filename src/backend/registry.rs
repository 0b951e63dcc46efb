//! Backend registration
//!
//! A [`Backend`] is a closed map from operation selector to handler
//! factory, assembled through [`BackendBuilder`] so the set of supported
//! operations is fixed — and validated — at registration time, never
//! resolved by name at call time. The [`BackendRegistry`] keeps backends in
//! registration order; registration and removal happen during startup,
//! while the active flag may be toggled on a shared registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::dispatch::DispatchMode;
use super::error::{BackendError, RegistryError};
use super::operation::{Operation, RenderRequest};

/// A render handler constructed fresh for every dispatch
pub trait RenderHandler: Send {
    /// Handle one request
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError>;
}

type HandlerFactory = Box<dyn Fn() -> Box<dyn RenderHandler> + Send + Sync>;

/// A named group of operation handlers
pub struct Backend {
    handlers: HashMap<Operation, HandlerFactory>,
}

impl Backend {
    /// Start building a backend
    pub fn builder() -> BackendBuilder {
        BackendBuilder {
            handlers: HashMap::new(),
        }
    }

    /// Whether the backend implements the operation
    pub fn supports(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }

    /// Operations the backend implements
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|op| self.supports(*op))
            .collect()
    }

    pub(super) fn make_handler(&self, operation: Operation) -> Option<Box<dyn RenderHandler>> {
        self.handlers.get(&operation).map(|factory| factory())
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("operations", &self.operations())
            .finish()
    }
}

/// Builder for [`Backend`]
pub struct BackendBuilder {
    handlers: HashMap<Operation, HandlerFactory>,
}

impl BackendBuilder {
    /// Register a handler factory for an operation
    ///
    /// The factory runs once per dispatch, so every invocation gets a fresh
    /// handler instance. A second factory for the same operation replaces
    /// the first.
    pub fn handler<H, F>(mut self, operation: Operation, factory: F) -> Self
    where
        H: RenderHandler + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.handlers
            .insert(operation, Box::new(move || Box::new(factory())));
        self
    }

    /// Finish the backend
    pub fn build(self) -> Backend {
        Backend {
            handlers: self.handlers,
        }
    }
}

pub(super) struct RegisteredBackend {
    pub(super) name: String,
    pub(super) active: AtomicBool,
    pub(super) backend: Backend,
}

/// Ordered registry of named backends
///
/// Dispatch iterates entries in registration order; see
/// [`dispatch`](BackendRegistry::dispatch).
pub struct BackendRegistry {
    pub(super) entries: Vec<RegisteredBackend>,
    pub(super) mode: DispatchMode,
}

impl BackendRegistry {
    /// Create an empty registry in lenient mode
    pub fn new() -> Self {
        Self::with_mode(DispatchMode::Lenient)
    }

    /// Create an empty registry with an explicit missing-operation mode
    pub fn with_mode(mode: DispatchMode) -> Self {
        Self {
            entries: Vec::new(),
            mode,
        }
    }

    /// The configured missing-operation mode
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Register a backend under a unique name
    ///
    /// `default_active` controls whether dispatch reaches it until toggled.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        backend: Backend,
        default_active: bool,
    ) -> Result<(), RegistryError> {
        let name = name.into();

        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::DuplicateBackend(name));
        }

        tracing::info!(
            backend = %name,
            operations = ?backend.operations(),
            active = default_active,
            "Backend registered"
        );

        self.entries.push(RegisteredBackend {
            name,
            active: AtomicBool::new(default_active),
            backend,
        });
        Ok(())
    }

    /// Remove a backend by name
    pub fn unregister(&mut self, name: &str) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);

        if self.entries.len() == before {
            tracing::warn!(backend = %name, "Unregister of unknown backend ignored");
        } else {
            tracing::info!(backend = %name, "Backend unregistered");
        }
    }

    /// Toggle whether a backend participates in dispatch
    pub fn set_active(&self, name: &str, active: bool) {
        match self.entries.iter().find(|entry| entry.name == name) {
            Some(entry) => entry.active.store(active, Ordering::Relaxed),
            None => tracing::warn!(backend = %name, "Activation toggle for unknown backend ignored"),
        }
    }

    /// Whether a backend is currently active, if registered
    pub fn is_active(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.active.load(Ordering::Relaxed))
    }

    /// Registered backend names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Number of registered backends
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no backend is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    impl RenderHandler for NoopHandler {
        fn render(&mut self, _request: &RenderRequest) -> Result<(), BackendError> {
            Ok(())
        }
    }

    fn noop_backend() -> Backend {
        Backend::builder()
            .handler(Operation::NoData, || NoopHandler)
            .build()
    }

    #[test]
    fn test_register_and_names() {
        let mut registry = BackendRegistry::new();
        registry.register("terminal", noop_backend(), true).unwrap();
        registry.register("web", noop_backend(), true).unwrap();

        assert_eq!(registry.names(), vec!["terminal", "web"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BackendRegistry::new();
        registry.register("terminal", noop_backend(), true).unwrap();

        let result = registry.register("terminal", noop_backend(), true);
        assert!(matches!(result, Err(RegistryError::DuplicateBackend(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = BackendRegistry::new();
        registry.register("terminal", noop_backend(), true).unwrap();
        registry.unregister("terminal");

        assert!(registry.is_empty());
        // Unknown name is ignored.
        registry.unregister("terminal");
    }

    #[test]
    fn test_active_toggle() {
        let mut registry = BackendRegistry::new();
        registry.register("web", noop_backend(), false).unwrap();

        assert_eq!(registry.is_active("web"), Some(false));
        registry.set_active("web", true);
        assert_eq!(registry.is_active("web"), Some(true));
        assert_eq!(registry.is_active("nope"), None);
    }

    #[test]
    fn test_backend_operations() {
        let backend = Backend::builder()
            .handler(Operation::NoData, || NoopHandler)
            .handler(Operation::DeviceList, || NoopHandler)
            .build();

        assert!(backend.supports(Operation::NoData));
        assert!(backend.supports(Operation::DeviceList));
        assert!(!backend.supports(Operation::NodeTree));
    }
}
