//! Long-lived streaming response bodies
//!
//! Every streaming endpoint pairs a chunk generator with a MIME type and
//! passes both through [`streaming_response`], so connect/disconnect
//! handling exists exactly once. A stream moves through four states:
//! idle (registered, no reader), connected (response built), streaming
//! (suspend-until-data, emit, throttle delay, repeat) and disconnected.
//! Disconnection — the consumer closing, or the transport failing an emit —
//! drops the body and with it the generator; it is an expected outcome and
//! is logged at debug severity only.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::broadcast::FrameQueue;

/// MIME type of the video endpoint; the content boundary token is `frame`
pub const VIDEO_MIME: &str = "multipart/x-mixed-replace; boundary=frame";

/// MIME type of the metric endpoints
pub const EVENT_MIME: &str = "text/event-stream";

/// Logs the stream lifecycle; dropped together with the response body
struct StreamGuard {
    endpoint: &'static str,
}

impl StreamGuard {
    fn connect(endpoint: &'static str) -> Self {
        tracing::debug!(endpoint, "Stream connected");
        Self { endpoint }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        tracing::debug!(endpoint = self.endpoint, "Stream disconnected");
    }
}

/// Wrap a chunk generator and a MIME type into a streaming response
pub fn streaming_response<S>(endpoint: &'static str, mime: &'static str, stream: S) -> Response
where
    S: Stream<Item = Bytes> + Send + 'static,
{
    let guard = StreamGuard::connect(endpoint);
    let body = stream.map(move |chunk| {
        // Owned by the closure so the disconnect log fires when the
        // consumer drops the body.
        let _ = &guard;
        Ok::<_, Infallible>(chunk)
    });

    ([(header::CONTENT_TYPE, mime)], Body::from_stream(body)).into_response()
}

/// One multipart chunk: `--frame`, a JPEG content header, the bytes
pub fn multipart_chunk(data: &Bytes) -> Bytes {
    let mut chunk = BytesMut::with_capacity(data.len() + 64);
    chunk.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
    chunk.extend_from_slice(data);
    chunk.extend_from_slice(b"\r\n");
    chunk.freeze()
}

/// One server-sent event line
pub fn sse_event(value: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", value))
}

/// Video chunk generator: pop, emit, throttle, repeat
///
/// Ends when the queue is closed and drained.
pub fn video_stream(queue: Arc<FrameQueue>, interval: Duration) -> impl Stream<Item = Bytes> {
    futures::stream::unfold((queue, interval), |(queue, interval)| async move {
        let frame = queue.pop().await?;
        let chunk = multipart_chunk(&frame.data);
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        Some((chunk, (queue, interval)))
    })
}

/// Metric event generator: emit one snapshot value per interval
///
/// Clocked only by `interval`, independent of video cadence; runs until
/// the consumer disconnects.
pub fn metric_stream<F>(interval: Duration, value: F) -> impl Stream<Item = Bytes>
where
    F: Fn() -> String + Send + 'static,
{
    futures::stream::unfold(value, move |value| async move {
        tokio::time::sleep(interval).await;
        let event = sse_event(&value());
        Some((event, value))
    })
}

#[cfg(test)]
mod tests {
    use crate::broadcast::{Frame, QueueConfig};

    use super::*;

    #[test]
    fn test_multipart_chunk_layout() {
        let chunk = multipart_chunk(&Bytes::from_static(b"JPEG"));

        assert_eq!(
            &chunk[..],
            b"--frame\r\nContent-Type: image/jpeg\r\n\r\nJPEG\r\n"
        );
    }

    #[test]
    fn test_sse_event_layout() {
        assert_eq!(&sse_event("42")[..], b"data: 42\n\n");
    }

    #[tokio::test]
    async fn test_video_stream_emits_pushed_frames() {
        let queue = Arc::new(FrameQueue::with_config(
            QueueConfig::default().max_rate(0.0),
        ));
        queue.push(Frame::new(Bytes::from_static(b"one")));

        let mut stream = Box::pin(video_stream(Arc::clone(&queue), Duration::ZERO));

        let chunk = stream.next().await.unwrap();
        assert!(chunk.ends_with(b"one\r\n"));
    }

    #[tokio::test]
    async fn test_video_stream_ends_on_close() {
        let queue = Arc::new(FrameQueue::with_config(
            QueueConfig::default().max_rate(0.0),
        ));
        queue.push(Frame::new(Bytes::from_static(b"last")));
        queue.close();

        let mut stream = Box::pin(video_stream(Arc::clone(&queue), Duration::ZERO));

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_stream_applies_throttle_delay() {
        let queue = Arc::new(FrameQueue::with_config(
            QueueConfig::default().max_rate(0.0),
        ));
        queue.push(Frame::new(Bytes::from_static(b"a")));
        queue.push(Frame::new(Bytes::from_static(b"b")));

        let mut stream = Box::pin(video_stream(Arc::clone(&queue), Duration::from_millis(100)));

        let start = tokio::time::Instant::now();
        stream.next().await.unwrap();
        stream.next().await.unwrap();

        // Each chunk carries the per-stream delay.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_metric_stream_cadence() {
        let mut stream = Box::pin(metric_stream(Duration::from_millis(500), || "7".to_string()));

        let start = tokio::time::Instant::now();
        let event = stream.next().await.unwrap();
        assert_eq!(&event[..], b"data: 7\n\n");
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
