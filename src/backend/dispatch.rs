//! Fan-out dispatch with per-backend failure isolation
//!
//! `dispatch` forwards one request to every active backend in registration
//! order. A backend without a handler for the operation is skipped (lenient
//! mode) or turns the call into a missing-operation error (strict mode — a
//! registry-level switch for catching wiring mistakes, not a per-call
//! option). A handler failure is downgraded to a warning naming the
//! backend, the operation and the error; it never stops the remaining
//! backends and never fails the dispatch itself.

use super::error::{BackendError, DispatchError};
use super::operation::{Operation, RenderRequest};
use super::registry::BackendRegistry;

/// How dispatch treats a backend without a matching handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Skip silently
    #[default]
    Lenient,
    /// Fail the dispatch with [`DispatchError::MissingOperation`]
    Strict,
}

/// One isolated handler failure
#[derive(Debug, Clone)]
pub struct DispatchFailure {
    pub backend: String,
    pub operation: Operation,
    pub error: BackendError,
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// Backends whose handler ran successfully
    pub invoked: Vec<String>,
    /// Active backends without a handler for the operation
    pub skipped: Vec<String>,
    /// Backends whose handler failed
    pub failures: Vec<DispatchFailure>,
}

impl DispatchSummary {
    /// Whether every reached handler succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl BackendRegistry {
    /// Forward a request to every active backend
    pub fn dispatch(&self, request: &RenderRequest) -> Result<DispatchSummary, DispatchError> {
        let operation = request.operation();
        let mut summary = DispatchSummary::default();

        for entry in &self.entries {
            if !entry.active.load(std::sync::atomic::Ordering::Relaxed) {
                continue;
            }

            let Some(mut handler) = entry.backend.make_handler(operation) else {
                match self.mode {
                    DispatchMode::Lenient => {
                        summary.skipped.push(entry.name.clone());
                        continue;
                    }
                    DispatchMode::Strict => {
                        return Err(DispatchError::MissingOperation {
                            backend: entry.name.clone(),
                            operation,
                        });
                    }
                }
            };

            match handler.render(request) {
                Ok(()) => summary.invoked.push(entry.name.clone()),
                Err(error) => {
                    tracing::warn!(
                        backend = %entry.name,
                        operation = %operation,
                        error = %error,
                        "Render handler failed"
                    );
                    summary.failures.push(DispatchFailure {
                        backend: entry.name.clone(),
                        operation,
                        error,
                    });
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::super::registry::{Backend, RenderHandler};
    use super::*;

    struct CountingHandler {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    impl RenderHandler for CountingHandler {
        fn render(&mut self, _request: &RenderRequest) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                Err(BackendError::new("boom"))
            } else {
                Ok(())
            }
        }
    }

    fn counting_backend(calls: Arc<AtomicU32>, fail: bool) -> Backend {
        Backend::builder()
            .handler(Operation::NoData, move || CountingHandler {
                calls: Arc::clone(&calls),
                fail,
            })
            .build()
    }

    #[test]
    fn test_failure_is_isolated() {
        let a = Arc::new(AtomicU32::new(0));
        let b = Arc::new(AtomicU32::new(0));
        let c = Arc::new(AtomicU32::new(0));

        let mut registry = BackendRegistry::new();
        registry
            .register("a", counting_backend(Arc::clone(&a), false), true)
            .unwrap();
        registry
            .register("b", counting_backend(Arc::clone(&b), true), true)
            .unwrap();
        registry
            .register("c", counting_backend(Arc::clone(&c), false), true)
            .unwrap();

        let summary = registry.dispatch(&RenderRequest::NoData).unwrap();

        // a and c still executed exactly once each.
        assert_eq!(a.load(Ordering::Relaxed), 1);
        assert_eq!(b.load(Ordering::Relaxed), 1);
        assert_eq!(c.load(Ordering::Relaxed), 1);
        assert_eq!(summary.invoked, vec!["a", "c"]);
        // Exactly one failure, naming b.
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].backend, "b");
        assert_eq!(summary.failures[0].operation, Operation::NoData);
    }

    #[test]
    fn test_missing_operation_lenient() {
        let calls = Arc::new(AtomicU32::new(0));

        let mut registry = BackendRegistry::new();
        registry
            .register("x", counting_backend(Arc::clone(&calls), false), true)
            .unwrap();

        // x has no DeviceList handler: a no-op in lenient mode.
        let summary = registry
            .dispatch(&RenderRequest::DeviceList { devices: vec![] })
            .unwrap();
        assert_eq!(summary.skipped, vec!["x"]);
        assert!(summary.invoked.is_empty());
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_missing_operation_strict() {
        let calls = Arc::new(AtomicU32::new(0));

        let mut registry = BackendRegistry::with_mode(DispatchMode::Strict);
        registry
            .register("x", counting_backend(Arc::clone(&calls), false), true)
            .unwrap();

        let result = registry.dispatch(&RenderRequest::DeviceList { devices: vec![] });
        assert!(matches!(
            result,
            Err(DispatchError::MissingOperation { .. })
        ));
    }

    #[test]
    fn test_inactive_backend_not_reached() {
        let calls = Arc::new(AtomicU32::new(0));

        let mut registry = BackendRegistry::new();
        registry
            .register("x", counting_backend(Arc::clone(&calls), false), false)
            .unwrap();

        registry.dispatch(&RenderRequest::NoData).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        registry.set_active("x", true);
        registry.dispatch(&RenderRequest::NoData).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_registration_order_preserved() {
        let a = Arc::new(AtomicU32::new(0));
        let b = Arc::new(AtomicU32::new(0));

        let mut registry = BackendRegistry::new();
        registry
            .register("first", counting_backend(Arc::clone(&a), false), true)
            .unwrap();
        registry
            .register("second", counting_backend(Arc::clone(&b), false), true)
            .unwrap();

        let summary = registry.dispatch(&RenderRequest::NoData).unwrap();
        assert_eq!(summary.invoked, vec!["first", "second"]);
    }

    #[test]
    fn test_fresh_handler_per_dispatch() {
        struct OneShot {
            used: bool,
        }

        impl RenderHandler for OneShot {
            fn render(&mut self, _request: &RenderRequest) -> Result<(), BackendError> {
                if self.used {
                    return Err(BackendError::new("handler reused across dispatches"));
                }
                self.used = true;
                Ok(())
            }
        }

        let backend = Backend::builder()
            .handler(Operation::NoData, || OneShot { used: false })
            .build();

        let mut registry = BackendRegistry::new();
        registry.register("oneshot", backend, true).unwrap();

        // Each dispatch constructs a fresh instance, so both succeed.
        assert!(registry.dispatch(&RenderRequest::NoData).unwrap().is_clean());
        assert!(registry.dispatch(&RenderRequest::NoData).unwrap().is_clean());
    }
}
