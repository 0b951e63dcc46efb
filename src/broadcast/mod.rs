//! Live frame broadcast pipeline
//!
//! Decouples one frame producer from independently-clocked streaming
//! consumers:
//!
//! ```text
//!  [producer thread]                                 [tokio consumers]
//!   FrameReceived ──► FrameQueue (throttle, C, ──►  video stream  pop()
//!        │             drop-oldest)
//!        └──────────► StreamMetrics ─────────────►  metric streams
//!                      (count / rate / shape)        snapshot()
//! ```
//!
//! The queue and the metrics are the only mutable state shared across the
//! producer/consumer boundary; both synchronize internally, so the producer
//! is never blocked and consumers suspend cooperatively on an empty queue.

pub mod config;
pub mod frame;
pub mod metrics;
pub mod queue;
pub mod rate;

pub use config::QueueConfig;
pub use frame::{Frame, FrameShape};
pub use metrics::{MetricsSnapshot, StreamMetrics};
pub use queue::{FrameQueue, PushOutcome};
pub use rate::RateTracker;
