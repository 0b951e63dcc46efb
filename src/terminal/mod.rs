//! Terminal render backend
//!
//! Writes device lists, selection outcomes and configuration trees to
//! stdout as plain indented text. Registered under the name `"terminal"`
//! by convention.

use crate::backend::{Backend, BackendError, Operation, RenderHandler, RenderRequest};
use crate::device::DeviceDescriptor;
use crate::node::NodeRenderer;

/// Build the terminal backend with the default node renderer
pub fn backend() -> Backend {
    backend_with(NodeRenderer::new())
}

/// Build the terminal backend with a custom node renderer
pub fn backend_with(renderer: NodeRenderer) -> Backend {
    Backend::builder()
        .handler(Operation::DeviceList, || DeviceListHandler)
        .handler(Operation::DeviceSelection, || DeviceSelectionHandler)
        .handler(Operation::AccessDenied, || AccessDeniedHandler)
        .handler(Operation::NodeTree, move || NodeTreeHandler {
            renderer: renderer.clone(),
        })
        .handler(Operation::NoData, || SignalHandler {
            message: "no image data received within the timeout",
        })
        .handler(Operation::EmptyPayload, || SignalHandler {
            message: "buffer received without a payload",
        })
        .handler(Operation::EmptyComponent, || SignalHandler {
            message: "payload received without an image component",
        })
        .build()
}

fn print_device(device: &DeviceDescriptor) {
    println!("Name: {}", device.display_name);
    println!("  Model: {}", device.model);
    println!("  Serial number: {}", device.serial_number);
    println!("  ID: {}", device.id);
    println!("  Vendor: {}", device.vendor);
    println!("  Version: {}", device.version);
    println!("  TL type: {}", device.tl_type);
    println!("  User defined name: {}", device.user_defined_name);
    println!("  Access status: {}", device.access_status);
}

struct DeviceListHandler;

impl RenderHandler for DeviceListHandler {
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError> {
        let RenderRequest::DeviceList { devices } = request else {
            return Err(BackendError::new("unexpected request payload"));
        };

        if devices.is_empty() {
            println!(
                "No device or camera is available. Check that they are properly \
                 connected and powered on."
            );
            return Ok(());
        }

        println!("Devices ({}):", devices.len());
        for device in devices {
            print_device(device);
        }
        Ok(())
    }
}

struct DeviceSelectionHandler;

impl RenderHandler for DeviceSelectionHandler {
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError> {
        let RenderRequest::DeviceSelection {
            devices,
            requested,
            selected,
        } = request
        else {
            return Err(BackendError::new("unexpected request payload"));
        };

        match selected {
            Some(device) => println!("Selected device {} ({})", device.id, device.display_name),
            None => {
                println!("No device matches the requested id {:?}.", requested);
                if devices.is_empty() {
                    println!("No device is currently available.");
                } else {
                    let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
                    println!("Available ids: {}", ids.join(", "));
                }
            }
        }
        Ok(())
    }
}

struct AccessDeniedHandler;

impl RenderHandler for AccessDeniedHandler {
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError> {
        let RenderRequest::AccessDenied { device, reason } = request else {
            return Err(BackendError::new("unexpected request payload"));
        };

        println!(
            "Access to device {} was denied: {}. It may be opened by another \
             application.",
            device, reason
        );
        Ok(())
    }
}

struct NodeTreeHandler {
    renderer: NodeRenderer,
}

impl RenderHandler for NodeTreeHandler {
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError> {
        let RenderRequest::NodeTree { device, root } = request else {
            return Err(BackendError::new("unexpected request payload"));
        };

        let rendered = self
            .renderer
            .render_tree(root, device)
            .map_err(|err| BackendError::new(err.to_string()))?;
        println!("{}", rendered);
        Ok(())
    }
}

struct SignalHandler {
    message: &'static str,
}

impl RenderHandler for SignalHandler {
    fn render(&mut self, _request: &RenderRequest) -> Result<(), BackendError> {
        println!("warning: {}", self.message);
        Ok(())
    }
}
