//! Web streaming configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the streaming endpoints
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Per-consumer video chunk rate in frames per second
    pub stream_rate: f64,

    /// Metric event rate in events per second
    ///
    /// Metric streams are clocked by this alone, independent of video
    /// cadence.
    pub info_rate: f64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5678)),
            stream_rate: 30.0,
            info_rate: 1.0,
        }
    }
}

impl WebConfig {
    /// Create a config with a custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the per-consumer video chunk rate
    pub fn stream_rate(mut self, rate: f64) -> Self {
        self.stream_rate = rate.max(0.0);
        self
    }

    /// Set the metric event rate
    pub fn info_rate(mut self, rate: f64) -> Self {
        self.info_rate = rate.max(0.1);
        self
    }

    /// Delay between video chunks for one consumer
    pub fn stream_interval(&self) -> Duration {
        if self.stream_rate > 0.0 {
            Duration::from_secs_f64(1.0 / self.stream_rate)
        } else {
            Duration::ZERO
        }
    }

    /// Delay between metric events
    pub fn info_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.info_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WebConfig::default();

        assert_eq!(config.bind_addr.port(), 5678);
        assert_eq!(config.stream_rate, 30.0);
        assert_eq!(config.info_rate, 1.0);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = WebConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.stream_rate, 30.0);
    }

    #[test]
    fn test_intervals() {
        let config = WebConfig::default().stream_rate(20.0).info_rate(2.0);

        assert_eq!(config.stream_interval(), Duration::from_millis(50));
        assert_eq!(config.info_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_unthrottled_stream() {
        let config = WebConfig::default().stream_rate(0.0);

        assert_eq!(config.stream_interval(), Duration::ZERO);
    }

    #[test]
    fn test_info_rate_floor() {
        // A zero info rate would never emit; clamped.
        let config = WebConfig::default().info_rate(0.0);

        assert!(config.info_interval() <= Duration::from_secs(10));
    }
}
