//! Live streaming demo with the simulated camera
//!
//! Run with: cargo run --example stream_server [BIND_ADDR] [DEVICE_ID]
//!
//! Examples:
//!   cargo run --example stream_server                     # 127.0.0.1:5678, sim0
//!   cargo run --example stream_server 0.0.0.0:8080        # custom bind address
//!   cargo run --example stream_server localhost:8080 sim0
//!
//! Then open http://127.0.0.1:5678/ for the live view, or curl the
//! endpoints directly:
//!
//!   curl http://127.0.0.1:5678/video_feed    # multipart MJPEG
//!   curl http://127.0.0.1:5678/frame_rate    # server-sent events
//!
//! Ctrl+C stops the acquisition loop, the streaming consumers and the
//! server, in that order, before releasing the device.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;

use camcast_rs::device::SimulatedProvider;
use camcast_rs::web::{self, WebState};
use camcast_rs::{
    AcquireOptions, BackendRegistry, CameraDriver, FrameQueue, QueueConfig, StreamMetrics,
    WebConfig,
};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:5678
/// - "localhost:8080" -> 127.0.0.1:8080
/// - "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 5678;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: stream_server [BIND_ADDR] [DEVICE_ID]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 127.0.0.1:5678)");
    eprintln!("  DEVICE_ID    Camera id to acquire from (default: sim0)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => SocketAddr::from(([127, 0, 0, 1], 5678)),
    };
    let device_id = args.get(2).map(String::as_str).unwrap_or("sim0").to_string();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("camcast_rs=debug".parse()?)
                .add_directive("stream_server=debug".parse()?),
        )
        .init();

    // Session-scoped shared state: the broadcast queue and the metrics.
    let queue = Arc::new(FrameQueue::with_config(QueueConfig::default()));
    let metrics = Arc::new(StreamMetrics::new());

    let mut registry = BackendRegistry::new();
    registry.register("terminal", camcast_rs::terminal::backend(), true)?;
    registry.register(
        "web",
        web::backend::backend(Arc::clone(&queue), Arc::clone(&metrics)),
        true,
    )?;
    let registry = Arc::new(registry);

    let driver = CameraDriver::new(SimulatedProvider::new(), Arc::clone(&registry));
    driver.list_devices()?;

    let web_config = WebConfig::with_addr(bind_addr);
    let state = WebState::new(Arc::clone(&queue), Arc::clone(&metrics), web_config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Streaming server with graceful shutdown.
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    println!("Streaming on http://{}/", bind_addr);
    println!();
    println!("  live view:  http://{}/", bind_addr);
    println!("  video:      http://{}/video_feed", bind_addr);
    println!("  metrics:    /frame_rate /frame_count /frame_shape");
    println!();

    let mut server_shutdown = shutdown_rx.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, web::router(state))
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.changed().await;
            })
            .await
    });

    // Acquisition loop on its own execution context.
    let acquisition_shutdown = shutdown_rx.clone();
    let acquisition = tokio::task::spawn_blocking(move || {
        driver.acquire(&device_id, AcquireOptions::default(), acquisition_shutdown)
    });

    tokio::signal::ctrl_c().await?;
    println!("\nShutting down...");

    // Cancel every outstanding task, then wait for all of them before the
    // device and the socket go away.
    let _ = shutdown_tx.send(true);
    queue.close();

    match acquisition.await? {
        Ok(stats) => println!(
            "Acquired {} frames ({} no-data signals)",
            stats.frames, stats.no_data
        ),
        Err(e) => eprintln!("Acquisition error: {}", e),
    }
    server.await??;

    Ok(())
}
