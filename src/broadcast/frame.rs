//! Frame types for the broadcast pipeline
//!
//! A [`Frame`] is an already-encoded image plus its capture instant. Frames
//! are designed to be cheap to clone due to `Bytes` reference counting.

use std::time::Instant;

use bytes::Bytes;

/// An encoded frame ready for broadcast
#[derive(Debug, Clone)]
pub struct Frame {
    /// Encoded image data (zero-copy via reference counting)
    pub data: Bytes,
    /// When the frame was captured
    pub captured_at: Instant,
}

impl Frame {
    /// Create a frame captured now
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            captured_at: Instant::now(),
        }
    }

    /// Create a frame with an explicit capture instant
    pub fn captured_at(data: Bytes, captured_at: Instant) -> Self {
        Self { data, captured_at }
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the frame carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pixel dimensions of the most recently observed raw image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameShape {
    pub width: u32,
    pub height: u32,
}

impl FrameShape {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for FrameShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
