//! # camcast
//!
//! Camera acquisition and live streaming library: a render-dispatch
//! framework fanning operations out across pluggable backends, and a
//! bounded, rate-throttled frame broadcast pipeline feeding long-lived
//! HTTP consumers.
//!
//! ```text
//!  DeviceProvider ──► CameraDriver ──► BackendRegistry::dispatch
//!                                        │            │
//!                                   ["terminal"]   ["web"]
//!                                    node trees,   JPEG encode
//!                                    device lists      │
//!                                                 FrameQueue ──► /video_feed
//!                                                 StreamMetrics ► /frame_rate,
//!                                                                 /frame_count,
//!                                                                 /frame_shape
//! ```
//!
//! The device layer is a collaborator behind the [`device`] traits; a
//! [`device::SimulatedProvider`] is included for demos and tests. See the
//! `stream_server` example for a fully wired session.

pub mod backend;
pub mod broadcast;
pub mod device;
pub mod driver;
pub mod error;
pub mod node;
pub mod terminal;
pub mod web;

pub use backend::{Backend, BackendRegistry, DispatchMode, Operation, RenderRequest};
pub use broadcast::{Frame, FrameQueue, FrameShape, QueueConfig, StreamMetrics};
pub use driver::{AcquireOptions, AcquireStats, CameraDriver};
pub use error::{Error, Result};
pub use node::{ConfigNode, NodeRenderer};
pub use web::{WebConfig, WebState};
