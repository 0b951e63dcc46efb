//! Operation selectors and their payloads
//!
//! Every render operation the dispatcher can fan out is a variant of
//! [`RenderRequest`]; [`Operation`] is the closed selector set used to key
//! handler registration, so an unknown selector cannot exist at call time.

use crate::device::{DeviceDescriptor, RawImage};
use crate::node::ConfigNode;

/// Selector for a render operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Render the list of available devices
    DeviceList,
    /// Render the outcome of selecting a device by id
    DeviceSelection,
    /// Render an access-denied diagnostic for a device
    AccessDenied,
    /// Render a device's configuration tree
    NodeTree,
    /// Consume one captured frame
    FrameReceived,
    /// Fetch produced nothing inside the timeout
    NoData,
    /// Fetch produced a buffer without a payload
    EmptyPayload,
    /// Fetch produced a payload without an image component
    EmptyComponent,
}

impl Operation {
    /// All selectors, in a stable order
    pub const ALL: [Operation; 8] = [
        Operation::DeviceList,
        Operation::DeviceSelection,
        Operation::AccessDenied,
        Operation::NodeTree,
        Operation::FrameReceived,
        Operation::NoData,
        Operation::EmptyPayload,
        Operation::EmptyComponent,
    ];

    /// Selector name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::DeviceList => "device_list",
            Operation::DeviceSelection => "device_selection",
            Operation::AccessDenied => "access_denied",
            Operation::NodeTree => "node_tree",
            Operation::FrameReceived => "frame_received",
            Operation::NoData => "no_data",
            Operation::EmptyPayload => "empty_payload",
            Operation::EmptyComponent => "empty_component",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A render operation plus the payload forwarded to every handler
#[derive(Debug, Clone)]
pub enum RenderRequest {
    DeviceList {
        devices: Vec<DeviceDescriptor>,
    },
    DeviceSelection {
        devices: Vec<DeviceDescriptor>,
        requested: String,
        selected: Option<DeviceDescriptor>,
    },
    AccessDenied {
        device: String,
        reason: String,
    },
    NodeTree {
        device: String,
        root: ConfigNode,
    },
    FrameReceived {
        image: RawImage,
    },
    NoData,
    EmptyPayload,
    EmptyComponent,
}

impl RenderRequest {
    /// The selector this request resolves handlers for
    pub fn operation(&self) -> Operation {
        match self {
            RenderRequest::DeviceList { .. } => Operation::DeviceList,
            RenderRequest::DeviceSelection { .. } => Operation::DeviceSelection,
            RenderRequest::AccessDenied { .. } => Operation::AccessDenied,
            RenderRequest::NodeTree { .. } => Operation::NodeTree,
            RenderRequest::FrameReceived { .. } => Operation::FrameReceived,
            RenderRequest::NoData => Operation::NoData,
            RenderRequest::EmptyPayload => Operation::EmptyPayload,
            RenderRequest::EmptyComponent => Operation::EmptyComponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_operation_mapping() {
        assert_eq!(RenderRequest::NoData.operation(), Operation::NoData);
        assert_eq!(
            RenderRequest::DeviceList { devices: vec![] }.operation(),
            Operation::DeviceList
        );
    }

    #[test]
    fn test_operation_names_unique() {
        let names: std::collections::HashSet<_> =
            Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }
}
