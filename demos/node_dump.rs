//! List the simulated devices and dump a configuration tree
//!
//! Run with: cargo run --example node_dump [DEVICE_ID]
//!
//! Pass `--all` to include inaccessible nodes as explicit markers instead
//! of omitting them.

use std::sync::Arc;

use camcast_rs::device::SimulatedProvider;
use camcast_rs::node::NodeRenderer;
use camcast_rs::{BackendRegistry, CameraDriver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let include_all = args.iter().any(|a| a == "--all");
    let device_id = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("sim0");

    let renderer = NodeRenderer::new().exclude_inaccessible(!include_all);

    let mut registry = BackendRegistry::new();
    registry.register("terminal", camcast_rs::terminal::backend_with(renderer), true)?;
    let registry = Arc::new(registry);

    let driver = CameraDriver::new(SimulatedProvider::new(), registry);

    driver.list_devices()?;

    if let Err(e) = driver.show_nodes(device_id) {
        // The selection diagnostic has already been rendered.
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
