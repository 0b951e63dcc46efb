//! Bounded drop-oldest frame buffer with admission throttling
//!
//! The queue decouples a blocking frame producer from async streaming
//! consumers. Two independent policies keep it bounded:
//!
//! 1. **Admission throttle**: a frame arriving less than `1/max_rate`
//!    seconds after the last *accepted* frame is dropped before it ever
//!    reaches the buffer, regardless of occupancy.
//! 2. **Drop-oldest overflow**: once at capacity, the oldest buffered frame
//!    is evicted to admit the new one. The producer is never blocked and
//!    the freshest data is never rejected for space reasons.
//!
//! `push` is synchronous and callable from a dedicated producer thread;
//! `pop` suspends cooperatively until a frame arrives or the queue closes.

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::Notify;

use super::config::QueueConfig;
use super::frame::Frame;

/// Result of a push attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Frame admitted; `evicted` is set when the oldest entry was dropped
    /// to make room
    Accepted { evicted: bool },
    /// Frame arrived inside the minimum inter-admission interval
    Throttled,
    /// Queue has been closed
    Closed,
}

impl PushOutcome {
    /// Whether the frame entered the buffer
    pub fn is_accepted(&self) -> bool {
        matches!(self, PushOutcome::Accepted { .. })
    }
}

struct Inner {
    frames: VecDeque<Frame>,
    last_accepted: Option<Instant>,
    closed: bool,
}

/// Bounded drop-oldest frame buffer
pub struct FrameQueue {
    config: QueueConfig,
    inner: Mutex<Inner>,
    notify: Notify,
}

impl FrameQueue {
    /// Create a queue with default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue with custom configuration
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                frames: VecDeque::new(),
                last_accepted: None,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Get the queue configuration
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Offer a frame for admission at the current instant
    pub fn push(&self, frame: Frame) -> PushOutcome {
        self.push_at(frame, Instant::now())
    }

    /// Offer a frame for admission at an explicit instant
    ///
    /// The throttle check precedes the capacity check and is independent of
    /// it: a throttled frame is dropped even when the buffer has room.
    pub fn push_at(&self, frame: Frame, now: Instant) -> PushOutcome {
        let mut inner = self.lock();

        if inner.closed {
            return PushOutcome::Closed;
        }

        if let (Some(min_interval), Some(last)) =
            (self.config.min_interval(), inner.last_accepted)
        {
            if now.duration_since(last) < min_interval {
                return PushOutcome::Throttled;
            }
        }

        let evicted = if inner.frames.len() >= self.config.capacity {
            inner.frames.pop_front();
            true
        } else {
            false
        };

        inner.frames.push_back(frame);
        inner.last_accepted = Some(now);
        drop(inner);

        self.notify.notify_one();
        PushOutcome::Accepted { evicted }
    }

    /// Take the oldest buffered frame, suspending until one is available
    ///
    /// Returns `None` once the queue is closed and drained. This is the
    /// single suspension point on the consumer side.
    pub async fn pop(&self) -> Option<Frame> {
        loop {
            // Register interest before checking state so a push or close
            // racing with the check cannot be missed.
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();

            {
                let mut inner = self.lock();
                if let Some(frame) = inner.frames.pop_front() {
                    return Some(frame);
                }
                if inner.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Take the oldest buffered frame without suspending
    pub fn try_pop(&self) -> Option<Frame> {
        self.lock().frames.pop_front()
    }

    /// Number of buffered frames
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.lock().frames.is_empty()
    }

    /// Close the queue, waking every suspended consumer
    ///
    /// Consumers drain what is buffered, then receive `None`. Further
    /// pushes report [`PushOutcome::Closed`].
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}
