//! Shared state for the streaming endpoints

use std::sync::Arc;

use crate::broadcast::{FrameQueue, StreamMetrics};

use super::config::WebConfig;

/// State shared across request handlers
///
/// Cheap to clone; all handlers see the same queue and metrics. Scoped to
/// one streaming session rather than the process.
#[derive(Clone)]
pub struct WebState {
    pub queue: Arc<FrameQueue>,
    pub metrics: Arc<StreamMetrics>,
    pub config: WebConfig,
}

impl WebState {
    pub fn new(queue: Arc<FrameQueue>, metrics: Arc<StreamMetrics>, config: WebConfig) -> Self {
        Self {
            queue,
            metrics,
            config,
        }
    }
}
