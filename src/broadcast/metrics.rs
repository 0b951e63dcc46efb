//! Session-scoped stream metrics
//!
//! One producer mutates, any number of streaming consumers read. The single
//! mutation path is [`StreamMetrics::update`]; consumers take point-in-time
//! [`MetricsSnapshot`]s on their own clock.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use super::frame::FrameShape;
use super::rate::RateTracker;

struct Counters {
    frame_count: u64,
    last_shape: Option<FrameShape>,
    rate: RateTracker,
}

/// Shared frame counters for one streaming session
pub struct StreamMetrics {
    counters: Mutex<Counters>,
}

/// Point-in-time view of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total frames observed since the session started
    pub frame_count: u64,
    /// Frames observed in the trailing second
    pub frame_rate: usize,
    /// Dimensions of the most recent frame
    pub last_shape: Option<FrameShape>,
}

impl StreamMetrics {
    /// Create zeroed metrics
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters {
                frame_count: 0,
                last_shape: None,
                rate: RateTracker::new(),
            }),
        }
    }

    /// Record one observed frame
    pub fn update(&self, shape: FrameShape) {
        self.update_at(shape, Instant::now());
    }

    /// Record one observed frame at an explicit instant
    pub fn update_at(&self, shape: FrameShape, now: Instant) {
        let mut counters = self.lock();
        counters.frame_count += 1;
        counters.last_shape = Some(shape);
        counters.rate.record_at(now);
    }

    /// Take a snapshot of the counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_at(Instant::now())
    }

    /// Take a snapshot with an explicit rate-window end
    pub fn snapshot_at(&self, now: Instant) -> MetricsSnapshot {
        let mut counters = self.lock();
        MetricsSnapshot {
            frame_count: counters.frame_count,
            frame_rate: counters.rate.rate_at(now),
            last_shape: counters.last_shape,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self::new()
    }
}
