//! Configuration for voice input

use serde::{Deserialize, Serialize};

/// Listening session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Recognition language (e.g., "en-US")
    pub language: String,

    /// Keep listening after each transcript. When false a session ends
    /// after its first result.
    pub continuous: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
        }
    }
}

impl ListenConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.language.is_empty() {
            return Err("Language code cannot be empty".to_string());
        }
        if !self.language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("Language code contains invalid characters".to_string());
        }
        Ok(())
    }
}
