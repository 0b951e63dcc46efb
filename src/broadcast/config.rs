//! Broadcast queue configuration

use std::time::Duration;

/// Configuration for [`FrameQueue`](super::FrameQueue)
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of buffered frames
    pub capacity: usize,

    /// Maximum admission rate in frames per second (0.0 = no throttle)
    ///
    /// Frames arriving less than `1/max_rate` seconds after the last
    /// accepted frame are dropped before they reach the buffer.
    pub max_rate: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            max_rate: 30.0,
        }
    }
}

impl QueueConfig {
    /// Set the buffer capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the maximum admission rate in frames per second
    pub fn max_rate(mut self, max_rate: f64) -> Self {
        self.max_rate = max_rate.max(0.0);
        self
    }

    /// Minimum interval between accepted frames
    pub fn min_interval(&self) -> Option<Duration> {
        if self.max_rate > 0.0 {
            Some(Duration::from_secs_f64(1.0 / self.max_rate))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();

        assert_eq!(config.capacity, 10);
        assert_eq!(config.max_rate, 30.0);
    }

    #[test]
    fn test_builder_capacity() {
        let config = QueueConfig::default().capacity(4);

        assert_eq!(config.capacity, 4);
    }

    #[test]
    fn test_builder_capacity_floor() {
        // Zero capacity is meaningless; clamped to 1.
        let config = QueueConfig::default().capacity(0);

        assert_eq!(config.capacity, 1);
    }

    #[test]
    fn test_min_interval() {
        let config = QueueConfig::default().max_rate(20.0);

        assert_eq!(config.min_interval(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_no_throttle() {
        let config = QueueConfig::default().max_rate(0.0);

        assert_eq!(config.min_interval(), None);
    }

    #[test]
    fn test_builder_chaining() {
        let config = QueueConfig::default().capacity(32).max_rate(60.0);

        assert_eq!(config.capacity, 32);
        assert_eq!(config.max_rate, 60.0);
    }
}
