//! Web render backend
//!
//! Contributes the frame-consumption handler: encode the raw image as JPEG,
//! push it into the broadcast queue, update the stream metrics. Registered
//! under the name `"web"` by convention.

use std::sync::Arc;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::backend::{Backend, BackendError, Operation, RenderHandler, RenderRequest};
use crate::broadcast::{Frame, FrameQueue, StreamMetrics};
use crate::device::RawImage;

/// JPEG quality used for streamed frames
const JPEG_QUALITY: u8 = 85;

/// Build the web backend over a shared queue and metrics
pub fn backend(queue: Arc<FrameQueue>, metrics: Arc<StreamMetrics>) -> Backend {
    Backend::builder()
        .handler(Operation::FrameReceived, move || StreamImageHandler {
            queue: Arc::clone(&queue),
            metrics: Arc::clone(&metrics),
        })
        .build()
}

struct StreamImageHandler {
    queue: Arc<FrameQueue>,
    metrics: Arc<StreamMetrics>,
}

impl RenderHandler for StreamImageHandler {
    fn render(&mut self, request: &RenderRequest) -> Result<(), BackendError> {
        let RenderRequest::FrameReceived { image } = request else {
            return Err(BackendError::new("unexpected request payload"));
        };

        let jpeg = encode_jpeg(image)?;
        let outcome = self.queue.push(Frame::new(jpeg));
        tracing::trace!(
            width = image.width,
            height = image.height,
            ?outcome,
            "Frame offered to broadcast queue"
        );

        self.metrics.update(image.shape());
        Ok(())
    }
}

fn encode_jpeg(image: &RawImage) -> Result<Bytes, BackendError> {
    let expected = image.width as usize * image.height as usize;
    if image.pixels.len() != expected {
        return Err(BackendError::new(format!(
            "pixel buffer holds {} bytes, expected {} for {}x{}",
            image.pixels.len(),
            expected,
            image.width,
            image.height
        )));
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::L8,
        )
        .map_err(|err| BackendError::new(err.to_string()))?;
    Ok(Bytes::from(jpeg))
}

#[cfg(test)]
mod tests {
    use crate::backend::BackendRegistry;
    use crate::broadcast::QueueConfig;

    use super::*;

    fn image(width: u32, height: u32, pixels: usize) -> RawImage {
        RawImage {
            pixels: Bytes::from(vec![128u8; pixels]),
            width,
            height,
            timestamp: 0,
        }
    }

    fn wired() -> (Arc<FrameQueue>, Arc<StreamMetrics>, BackendRegistry) {
        let queue = Arc::new(FrameQueue::with_config(
            QueueConfig::default().max_rate(0.0),
        ));
        let metrics = Arc::new(StreamMetrics::new());

        let mut registry = BackendRegistry::new();
        registry
            .register("web", backend(Arc::clone(&queue), Arc::clone(&metrics)), true)
            .unwrap();
        (queue, metrics, registry)
    }

    #[test]
    fn test_frame_received_feeds_queue_and_metrics() {
        let (queue, metrics, registry) = wired();

        let summary = registry
            .dispatch(&RenderRequest::FrameReceived {
                image: image(32, 24, 32 * 24),
            })
            .unwrap();

        assert!(summary.is_clean());
        assert_eq!(queue.len(), 1);

        let frame = queue.try_pop().unwrap();
        // JPEG SOI marker.
        assert_eq!(&frame.data[..2], &[0xff, 0xd8]);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frame_count, 1);
        assert_eq!(snapshot.last_shape.unwrap().to_string(), "32x24");
    }

    #[test]
    fn test_bad_pixel_buffer_is_isolated() {
        let (queue, metrics, registry) = wired();

        let summary = registry
            .dispatch(&RenderRequest::FrameReceived {
                image: image(32, 24, 7),
            })
            .unwrap();

        // The failure stays inside the handler; nothing reached the queue
        // or the counters.
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].backend, "web");
        assert_eq!(queue.len(), 0);
        assert_eq!(metrics.snapshot().frame_count, 0);
    }

    #[test]
    fn test_only_frame_received_supported() {
        let queue = Arc::new(FrameQueue::new());
        let metrics = Arc::new(StreamMetrics::new());
        let backend = backend(queue, metrics);

        assert!(backend.supports(Operation::FrameReceived));
        assert!(!backend.supports(Operation::NodeTree));
        assert!(!backend.supports(Operation::DeviceList));
    }
}
