//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Display refresh rate that paces live detection
    pub refresh_rate_hz: u32,

    /// Pause before a chat reply is spoken (milliseconds)
    pub chat_reply_delay_ms: u64,

    /// Capacity of the event queue
    pub event_queue_size: usize,

    /// Start narration muted
    pub start_muted: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            chat_reply_delay_ms: 500,
            event_queue_size: 256,
            start_muted: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_rate_hz == 0 || self.refresh_rate_hz > 240 {
            return Err("refresh_rate_hz must be between 1 and 240".to_string());
        }
        if self.event_queue_size == 0 {
            return Err("event_queue_size must be greater than 0".to_string());
        }
        if self.chat_reply_delay_ms > 60_000 {
            return Err("chat_reply_delay_ms must be at most 60000".to_string());
        }
        Ok(())
    }

    /// Time between display refreshes
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.refresh_rate_hz.max(1)))
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat_reply_delay(), Duration::from_millis(500));
        assert_eq!(config.refresh_interval(), Duration::from_secs_f64(1.0 / 60.0));
        // One 60 Hz frame, truncated to whole microseconds
        assert_eq!(config.refresh_interval().as_micros(), 16_666);
    }

    #[test]
    fn test_invalid() {
        let config = PipelineConfig {
            refresh_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            event_queue_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
