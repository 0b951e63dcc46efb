//! HTTP routes for the streaming surface

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::Router;

use super::state::WebState;
use super::stream::{
    metric_stream, streaming_response, video_stream, EVENT_MIME, VIDEO_MIME,
};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>camcast live view</title>
</head>
<body>
  <h1>Live view</h1>
  <img src="/video_feed" alt="live stream">
  <p>
    rate: <span id="frame_rate">-</span>/s,
    frames: <span id="frame_count">-</span>,
    shape: <span id="frame_shape">-</span>
  </p>
  <script>
    for (const metric of ["frame_rate", "frame_count", "frame_shape"]) {
      const source = new EventSource("/" + metric);
      source.onmessage = (event) => {
        document.getElementById(metric).textContent = event.data;
      };
    }
  </script>
</body>
</html>
"#;

/// Build the streaming router
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/frame_rate", get(frame_rate))
        .route("/frame_count", get(frame_count))
        .route("/frame_shape", get(frame_shape))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn video_feed(State(state): State<WebState>) -> Response {
    streaming_response(
        "video_feed",
        VIDEO_MIME,
        video_stream(Arc::clone(&state.queue), state.config.stream_interval()),
    )
}

async fn frame_rate(State(state): State<WebState>) -> Response {
    let metrics = Arc::clone(&state.metrics);
    streaming_response(
        "frame_rate",
        EVENT_MIME,
        metric_stream(state.config.info_interval(), move || {
            metrics.snapshot().frame_rate.to_string()
        }),
    )
}

async fn frame_count(State(state): State<WebState>) -> Response {
    let metrics = Arc::clone(&state.metrics);
    streaming_response(
        "frame_count",
        EVENT_MIME,
        metric_stream(state.config.info_interval(), move || {
            metrics.snapshot().frame_count.to_string()
        }),
    )
}

async fn frame_shape(State(state): State<WebState>) -> Response {
    let metrics = Arc::clone(&state.metrics);
    streaming_response(
        "frame_shape",
        EVENT_MIME,
        metric_stream(state.config.info_interval(), move || {
            match metrics.snapshot().last_shape {
                Some(shape) => shape.to_string(),
                None => "-".to_string(),
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::broadcast::{Frame, FrameQueue, FrameShape, QueueConfig, StreamMetrics};
    use crate::web::config::WebConfig;

    use super::*;

    #[test]
    fn test_index_references_endpoints() {
        for endpoint in ["/video_feed", "frame_rate", "frame_count", "frame_shape"] {
            assert!(INDEX_HTML.contains(endpoint), "missing {}", endpoint);
        }
    }

    async fn serve(state: WebState) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        (addr, server)
    }

    async fn get_prefix(addr: std::net::SocketAddr, path: &str, needle: &[u8]) -> Vec<u8> {
        let mut socket = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path);
        socket.write_all(request.as_bytes()).await.unwrap();

        let mut collected = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        let mut buf = [0u8; 4096];
        loop {
            let read = tokio::time::timeout_at(deadline, socket.read(&mut buf))
                .await
                .expect("response timed out")
                .unwrap();
            assert!(read > 0, "connection closed before match");
            collected.extend_from_slice(&buf[..read]);
            if collected
                .windows(needle.len())
                .any(|window| window == needle)
            {
                return collected;
            }
        }
    }

    fn test_state() -> WebState {
        WebState::new(
            std::sync::Arc::new(FrameQueue::with_config(
                QueueConfig::default().max_rate(0.0),
            )),
            std::sync::Arc::new(StreamMetrics::new()),
            WebConfig::default().stream_rate(0.0).info_rate(10.0),
        )
    }

    #[tokio::test]
    async fn test_video_feed_serves_multipart() {
        let state = test_state();
        state.queue.push(Frame::new(Bytes::from_static(b"\xff\xd8JPG")));
        let (addr, server) = serve(state).await;

        let response =
            get_prefix(addr, "/video_feed", b"Content-Type: image/jpeg\r\n\r\n\xff\xd8JPG").await;

        let text = String::from_utf8_lossy(&response);
        assert!(text.contains("multipart/x-mixed-replace; boundary=frame"));
        assert!(text.contains("--frame"));

        server.abort();
    }

    #[tokio::test]
    async fn test_metric_endpoint_serves_events() {
        let state = test_state();
        state.metrics.update(FrameShape::new(320, 240));
        let (addr, server) = serve(state).await;

        let response = get_prefix(addr, "/frame_shape", b"data: 320x240\n\n").await;

        let text = String::from_utf8_lossy(&response);
        assert!(text.contains("text/event-stream"));

        server.abort();
    }

    #[tokio::test]
    async fn test_index_served() {
        let (addr, server) = serve(test_state()).await;

        let response = get_prefix(addr, "/", b"</html>").await;
        let text = String::from_utf8_lossy(&response);
        assert!(text.contains("200 OK"));

        server.abort();
    }
}
