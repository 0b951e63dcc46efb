//! Simulated device provider
//!
//! A deterministic stand-in for a real camera driver: moving test-pattern
//! frames and a representative configuration tree. Used by the demos and
//! the end-to-end tests; no hardware required.

use std::time::Duration;

use bytes::Bytes;

use crate::node::{
    AccessMode, BooleanNode, CategoryNode, CommandNode, ConfigNode, EnumEntryNode,
    EnumerationNode, FloatNode, IntegerNode, NodeInfo, RegisterNode, StringNode,
};

use super::{DeviceDescriptor, DeviceError, DeviceHandle, DeviceProvider, Fetch, RawImage};

/// Frame period reported in simulated capture timestamps
const FRAME_PERIOD_NS: u64 = 33_333_333;

/// Synthetic single-camera provider
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    descriptor: DeviceDescriptor,
    width: u32,
    height: u32,
    /// Every n-th fetch reports `NoData` (0 = never)
    dropout_every: u64,
    /// Refuse `open` with an access-denied error
    deny_access: bool,
}

impl SimulatedProvider {
    /// Create a provider exposing one device with id `sim0`
    pub fn new() -> Self {
        Self {
            descriptor: DeviceDescriptor {
                id: "sim0".into(),
                display_name: "Simulated Camera".into(),
                model: "SIM-2000".into(),
                serial_number: "00000001".into(),
                vendor: "camcast".into(),
                version: "1.0".into(),
                tl_type: "Custom".into(),
                user_defined_name: "bench".into(),
                access_status: true,
            },
            width: 320,
            height: 240,
            dropout_every: 0,
            deny_access: false,
        }
    }

    /// Set the generated image size
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Make every n-th fetch report `NoData`
    pub fn dropout_every(mut self, n: u64) -> Self {
        self.dropout_every = n;
        self
    }

    /// Make `open` fail with an access-denied error
    pub fn deny_access(mut self) -> Self {
        self.deny_access = true;
        self
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceProvider for SimulatedProvider {
    type Handle = SimulatedHandle;

    fn devices(&self) -> Vec<DeviceDescriptor> {
        vec![self.descriptor.clone()]
    }

    fn open(&self, id: &str) -> Result<Self::Handle, DeviceError> {
        if id != self.descriptor.id {
            return Err(DeviceError::NotFound { id: id.into() });
        }
        if self.deny_access {
            return Err(DeviceError::AccessDenied {
                id: id.into(),
                reason: "device is opened by another process".into(),
            });
        }
        Ok(SimulatedHandle {
            width: self.width,
            height: self.height,
            dropout_every: self.dropout_every,
            fetches: 0,
        })
    }
}

/// Open handle onto the simulated camera
#[derive(Debug)]
pub struct SimulatedHandle {
    width: u32,
    height: u32,
    dropout_every: u64,
    fetches: u64,
}

impl DeviceHandle for SimulatedHandle {
    fn fetch(&mut self, _timeout: Duration) -> Fetch {
        self.fetches += 1;

        if self.dropout_every > 0 && self.fetches % self.dropout_every == 0 {
            return Fetch::NoData;
        }

        // Diagonal gradient that drifts one pixel per frame.
        let shift = self.fetches as u32;
        let mut pixels = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(((x + y + shift) & 0xff) as u8);
            }
        }

        Fetch::Image(RawImage {
            pixels: Bytes::from(pixels),
            width: self.width,
            height: self.height,
            timestamp: self.fetches * FRAME_PERIOD_NS,
        })
    }

    fn node_tree(&self) -> ConfigNode {
        let rw = AccessMode::ReadWrite;
        let ro = AccessMode::ReadOnly;

        let device_control = ConfigNode::Category(CategoryNode::new(
            NodeInfo::new("DeviceControl", "Device Control", "Device identity", ro),
            vec![
                ConfigNode::String(StringNode::new(
                    NodeInfo::new("DeviceVendorName", "Device Vendor Name", "Vendor", ro),
                    Ok("camcast".into()),
                    64,
                )),
                ConfigNode::String(StringNode::new(
                    NodeInfo::new("DeviceModelName", "Device Model Name", "Model", ro),
                    Ok("SIM-2000".into()),
                    64,
                )),
            ],
        ));

        let image_format = ConfigNode::Category(CategoryNode::new(
            NodeInfo::new("ImageFormatControl", "Image Format Control", "Image geometry", rw),
            vec![
                ConfigNode::Integer(
                    IntegerNode::new(
                        NodeInfo::new("Width", "Width", "Image width in pixels", rw),
                        Ok(self.width as i64),
                    )
                    .range(16, 4096)
                    .increment(16)
                    .unit("px"),
                ),
                ConfigNode::Integer(
                    IntegerNode::new(
                        NodeInfo::new("Height", "Height", "Image height in pixels", rw),
                        Ok(self.height as i64),
                    )
                    .range(16, 4096)
                    .increment(16)
                    .unit("px"),
                ),
                ConfigNode::Enumeration(EnumerationNode::new(
                    NodeInfo::new("PixelFormat", "Pixel Format", "Output pixel format", rw),
                    vec![
                        EnumEntryNode::new(
                            NodeInfo::new("Mono8", "Mono8", "8-bit mono", rw),
                            0,
                        ),
                        EnumEntryNode::new(
                            NodeInfo::new("Mono12", "Mono12", "12-bit mono", rw),
                            1,
                        ),
                    ],
                    Ok(0),
                )),
            ],
        ));

        let acquisition = ConfigNode::Category(CategoryNode::new(
            NodeInfo::new("AcquisitionControl", "Acquisition Control", "Acquisition", rw),
            vec![
                ConfigNode::Float(
                    FloatNode::new(
                        NodeInfo::new("ExposureTime", "Exposure Time", "Exposure time", rw),
                        Ok(10_000.0),
                    )
                    .range(10.0, 1_000_000.0)
                    .precision(1)
                    .unit("us"),
                ),
                ConfigNode::Boolean(BooleanNode::new(
                    NodeInfo::new("ReverseX", "Reverse X", "Horizontal flip", rw),
                    Ok(false),
                )),
                ConfigNode::Command(CommandNode::new(NodeInfo::new(
                    "AcquisitionStart",
                    "Acquisition Start",
                    "Start streaming",
                    AccessMode::WriteOnly,
                ))),
            ],
        ));

        // A register block the device refuses to expose; exercises the
        // inaccessible-node paths downstream.
        let transport = ConfigNode::Category(CategoryNode::new(
            NodeInfo::new("TransportLayerControl", "Transport Layer Control", "Transport", ro),
            vec![ConfigNode::Register(RegisterNode::new(
                NodeInfo::new(
                    "DeviceFirmware",
                    "Device Firmware",
                    "Raw firmware block",
                    AccessMode::NotImplemented,
                ),
                Ok(String::new()),
                0x1f00_0000,
                4096,
            ))],
        ));

        ConfigNode::Category(CategoryNode::new(
            NodeInfo::new("Root", "Root", "Device feature root", ro),
            vec![device_control, image_format, acquisition, transport],
        ))
    }
}
