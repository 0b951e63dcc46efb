//! Device-access collaborator boundary
//!
//! The camera/driver layer is external to this crate; these traits pin down
//! exactly what the core consumes: an ordered device list with stable ids,
//! an open/close lifecycle, a timeout-bounded fetch that yields either a
//! decoded image or one of the recoverable no-data signals, and the device's
//! configuration tree.

pub mod sim;

use std::time::Duration;

use bytes::Bytes;

use crate::broadcast::FrameShape;
use crate::node::ConfigNode;

pub use sim::{SimulatedHandle, SimulatedProvider};

/// Identity and properties of an available device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Stable device id, the key used to select a device
    pub id: String,
    /// Human-facing name
    pub display_name: String,
    pub model: String,
    pub serial_number: String,
    pub vendor: String,
    pub version: String,
    /// Transport layer type
    pub tl_type: String,
    pub user_defined_name: String,
    /// Whether the device reported itself as openable
    pub access_status: bool,
}

/// A decoded image as delivered by the device layer
///
/// Pixels are a single luma component, row-major, `width * height` bytes.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub pixels: Bytes,
    pub width: u32,
    pub height: u32,
    /// Device capture timestamp in nanoseconds
    pub timestamp: u64,
}

impl RawImage {
    /// Dimensions of the image
    pub fn shape(&self) -> FrameShape {
        FrameShape::new(self.width, self.height)
    }
}

/// Outcome of one fetch attempt
#[derive(Debug, Clone)]
pub enum Fetch {
    /// A complete image
    Image(RawImage),
    /// Nothing arrived inside the timeout
    NoData,
    /// A buffer arrived without a payload
    EmptyPayload,
    /// A payload arrived without an image component
    EmptyComponent,
}

/// Error from the device layer
#[derive(Debug, Clone)]
pub enum DeviceError {
    /// No device with the requested id
    NotFound { id: String },
    /// The device exists but refused access
    AccessDenied { id: String, reason: String },
    /// Driver-level failure
    Driver(String),
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::NotFound { id } => write!(f, "device not found: {}", id),
            DeviceError::AccessDenied { id, reason } => {
                write!(f, "access denied for device {}: {}", id, reason)
            }
            DeviceError::Driver(msg) => write!(f, "driver error: {}", msg),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Enumerates devices and opens them
pub trait DeviceProvider: Send + Sync {
    type Handle: DeviceHandle;

    /// Ordered list of available devices
    fn devices(&self) -> Vec<DeviceDescriptor>;

    /// Open a device by id; driver resources are released on drop
    fn open(&self, id: &str) -> Result<Self::Handle, DeviceError>;
}

/// An open device delivering images and its configuration tree
pub trait DeviceHandle: Send {
    /// Fetch the next image, waiting at most `timeout`
    fn fetch(&mut self, timeout: Duration) -> Fetch;

    /// The device's configuration tree (single root)
    fn node_tree(&self) -> ConfigNode;
}
