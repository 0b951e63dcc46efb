//! Acquisition orchestration
//!
//! [`CameraDriver`] glues the device collaborator to the render-dispatch
//! framework: it enumerates and selects devices, runs the blocking
//! acquisition loop, and reports everything it sees — device lists, node
//! trees, frames, recoverable fetch signals — through the backend registry.
//!
//! The acquisition loop is intentionally synchronous; callers run it on its
//! own execution context (`tokio::task::spawn_blocking` in the demos) and
//! stop it through a `watch` shutdown signal checked once per iteration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::backend::{BackendRegistry, RenderRequest};
use crate::device::{DeviceDescriptor, DeviceError, DeviceHandle, DeviceProvider, Fetch};
use crate::error::{Error, Result};

/// Options for the acquisition loop
#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Upper bound for one fetch attempt
    pub fetch_timeout: Duration,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(1),
        }
    }
}

impl AcquireOptions {
    /// Set the per-fetch timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Counters accumulated by one acquisition run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireStats {
    /// Complete frames delivered to the dispatcher
    pub frames: u64,
    /// Fetches that timed out with no data
    pub no_data: u64,
    /// Buffers without a payload
    pub empty_payload: u64,
    /// Payloads without an image component
    pub empty_component: u64,
}

/// Orchestrates one device provider against a backend registry
pub struct CameraDriver<P: DeviceProvider> {
    provider: P,
    backends: Arc<BackendRegistry>,
}

impl<P: DeviceProvider> CameraDriver<P> {
    /// Create a driver over a provider and a shared registry
    pub fn new(provider: P, backends: Arc<BackendRegistry>) -> Self {
        Self { provider, backends }
    }

    /// The shared backend registry
    pub fn backends(&self) -> &Arc<BackendRegistry> {
        &self.backends
    }

    /// Enumerate devices and render the list
    pub fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let devices = self.provider.devices();
        self.backends.dispatch(&RenderRequest::DeviceList {
            devices: devices.clone(),
        })?;
        Ok(devices)
    }

    /// Resolve a device id, rendering the selection outcome
    ///
    /// An unknown id is a fatal-selection error: the diagnostic has been
    /// rendered and the operation terminates under control.
    pub fn select_device(&self, id: &str) -> Result<DeviceDescriptor> {
        let devices = self.provider.devices();
        let selected = devices.iter().find(|device| device.id == id).cloned();

        self.backends.dispatch(&RenderRequest::DeviceSelection {
            devices: devices.clone(),
            requested: id.to_string(),
            selected: selected.clone(),
        })?;

        selected.ok_or_else(|| Error::DeviceNotFound {
            id: id.to_string(),
            available: devices.into_iter().map(|device| device.id).collect(),
        })
    }

    /// Render the configuration tree of a device
    pub fn show_nodes(&self, id: &str) -> Result<()> {
        let device = self.select_device(id)?;
        let handle = self.open(&device)?;

        self.backends.dispatch(&RenderRequest::NodeTree {
            device: device.id.clone(),
            root: handle.node_tree(),
        })?;
        Ok(())
    }

    /// Acquire frames until the shutdown signal flips
    ///
    /// Recoverable fetch signals (no data, empty payload, empty component)
    /// are rendered and the loop continues; only selection/open failures
    /// terminate the run.
    pub fn acquire(
        &self,
        id: &str,
        options: AcquireOptions,
        shutdown: watch::Receiver<bool>,
    ) -> Result<AcquireStats> {
        let device = self.select_device(id)?;
        let mut handle = self.open(&device)?;
        let mut stats = AcquireStats::default();

        tracing::info!(device = %device.id, "Acquisition started");

        while !*shutdown.borrow() {
            match handle.fetch(options.fetch_timeout) {
                Fetch::Image(image) => {
                    stats.frames += 1;
                    self.backends
                        .dispatch(&RenderRequest::FrameReceived { image })?;
                }
                Fetch::NoData => {
                    stats.no_data += 1;
                    self.backends.dispatch(&RenderRequest::NoData)?;
                }
                Fetch::EmptyPayload => {
                    stats.empty_payload += 1;
                    self.backends.dispatch(&RenderRequest::EmptyPayload)?;
                }
                Fetch::EmptyComponent => {
                    stats.empty_component += 1;
                    self.backends.dispatch(&RenderRequest::EmptyComponent)?;
                }
            }
        }

        tracing::info!(
            device = %device.id,
            frames = stats.frames,
            no_data = stats.no_data,
            "Acquisition stopped"
        );
        Ok(stats)
    }

    fn open(&self, device: &DeviceDescriptor) -> Result<P::Handle> {
        match self.provider.open(&device.id) {
            Ok(handle) => Ok(handle),
            Err(DeviceError::AccessDenied { id, reason }) => {
                self.backends.dispatch(&RenderRequest::AccessDenied {
                    device: id.clone(),
                    reason: reason.clone(),
                })?;
                Err(Error::AccessDenied { id, reason })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::backend::{Backend, BackendError, Operation, RenderHandler};
    use crate::device::SimulatedProvider;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        operations: Mutex<Vec<Operation>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<Operation> {
            self.operations.lock().unwrap().clone()
        }
    }

    struct RecordingHandler {
        recorder: Arc<Recorder>,
    }

    impl RenderHandler for RecordingHandler {
        fn render(&mut self, request: &RenderRequest) -> std::result::Result<(), BackendError> {
            self.recorder
                .operations
                .lock()
                .unwrap()
                .push(request.operation());
            Ok(())
        }
    }

    fn recording_registry() -> (Arc<BackendRegistry>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());

        let mut builder = Backend::builder();
        for operation in Operation::ALL {
            let recorder = Arc::clone(&recorder);
            builder = builder.handler(operation, move || RecordingHandler {
                recorder: Arc::clone(&recorder),
            });
        }

        let mut registry = BackendRegistry::new();
        registry.register("recorder", builder.build(), true).unwrap();
        (Arc::new(registry), recorder)
    }

    #[test]
    fn test_list_devices_renders() {
        let (registry, recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new(), registry);

        let devices = driver.list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(recorder.seen(), vec![Operation::DeviceList]);
    }

    #[test]
    fn test_select_unknown_device() {
        let (registry, recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new(), registry);

        let err = driver.select_device("ghost").unwrap_err();
        match err {
            Error::DeviceNotFound { id, available } => {
                assert_eq!(id, "ghost");
                assert_eq!(available, vec!["sim0"]);
            }
            other => panic!("unexpected error: {}", other),
        }
        // The selection outcome was rendered before the error returned.
        assert_eq!(recorder.seen(), vec![Operation::DeviceSelection]);
    }

    #[test]
    fn test_show_nodes_dispatches_tree() {
        let (registry, recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new(), registry);

        driver.show_nodes("sim0").unwrap();
        assert_eq!(
            recorder.seen(),
            vec![Operation::DeviceSelection, Operation::NodeTree]
        );
    }

    #[test]
    fn test_acquire_denied_access() {
        let (registry, recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new().deny_access(), registry);
        let (_tx, rx) = watch::channel(false);

        let err = driver
            .acquire("sim0", AcquireOptions::default(), rx)
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));
        assert_eq!(
            recorder.seen(),
            vec![Operation::DeviceSelection, Operation::AccessDenied]
        );
    }

    #[test]
    fn test_acquire_until_shutdown() {
        let (registry, recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new().dropout_every(3), registry);
        let (tx, rx) = watch::channel(false);

        let worker = std::thread::spawn(move || {
            driver.acquire(
                "sim0",
                AcquireOptions::default().fetch_timeout(Duration::from_millis(1)),
                rx,
            )
        });

        std::thread::sleep(Duration::from_millis(50));
        tx.send(true).unwrap();

        let stats = worker.join().unwrap().unwrap();
        assert!(stats.frames > 0);
        assert!(stats.no_data > 0);
        assert!(recorder.seen().contains(&Operation::FrameReceived));
        assert!(recorder.seen().contains(&Operation::NoData));
    }

    #[test]
    fn test_acquire_with_shutdown_preset() {
        let (registry, _recorder) = recording_registry();
        let driver = CameraDriver::new(SimulatedProvider::new(), registry);
        let (_tx, rx) = watch::channel(true);

        let stats = driver
            .acquire("sim0", AcquireOptions::default(), rx)
            .unwrap();
        assert_eq!(stats, AcquireStats::default());
    }
}
