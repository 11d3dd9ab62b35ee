//! Configuration for speech synthesis

use serde::{Deserialize, Serialize};

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speak narration at all (a disabled config narrates to the log only)
    pub enabled: bool,

    /// Preferred engine
    pub engine: TtsEngine,

    /// Voice settings
    pub voice: VoiceConfig,

    /// Speaking rate relative to normal (0.1-10.0, default 1.1)
    pub rate: f32,

    /// Volume (0.0-1.0, default 1.0)
    pub volume: f32,

    /// Pitch adjustment (-1.0 to 1.0, default 0.0)
    pub pitch: f32,
}

/// TTS engine type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngine {
    /// espeak-ng on the host
    Native,
    /// Print utterances to stdout
    Console,
}

/// Voice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Voice name/identifier
    pub name: Option<String>,

    /// Language code (e.g., "en-US", "es-ES")
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: TtsEngine::Native,
            voice: VoiceConfig::default(),
            rate: 1.1,
            volume: 1.0,
            pitch: 0.0,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            name: None,
            language: "en-US".to_string(),
        }
    }
}

impl VoiceConfig {
    /// Validate voice configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.language.is_empty() {
            return Err("Language code cannot be empty".to_string());
        }

        if self.language.len() > 32 {
            return Err("Language code too long (max 32 chars)".to_string());
        }

        if !self.language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(
                "Language code contains invalid characters (only alphanumeric and '-' allowed)"
                    .to_string(),
            );
        }

        if let Some(ref name) = self.name {
            if name.is_empty() {
                return Err("Voice name cannot be empty if provided".to_string());
            }
            if name.chars().any(|c| c == '\0' || c.is_control()) {
                return Err("Voice name contains invalid characters".to_string());
            }
        }

        Ok(())
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.1..=10.0).contains(&self.rate) {
            return Err("Speech rate must be between 0.1 and 10.0".to_string());
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err("Volume must be between 0.0 and 1.0".to_string());
        }

        if !(-1.0..=1.0).contains(&self.pitch) {
            return Err("Pitch must be between -1.0 and 1.0".to_string());
        }

        self.voice.validate()
    }

    /// Rate in words per minute for engines that take WPM (175 is normal)
    pub fn words_per_minute(&self) -> u32 {
        (175.0 * self.rate).round().clamp(80.0, 450.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SpeechConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate, 1.1);
        assert_eq!(config.engine, TtsEngine::Native);
        assert_eq!(config.voice.language, "en-US");
    }

    #[test]
    fn test_words_per_minute() {
        let config = SpeechConfig::default();
        assert_eq!(config.words_per_minute(), 193);

        let slow = SpeechConfig {
            rate: 0.1,
            ..SpeechConfig::default()
        };
        assert_eq!(slow.words_per_minute(), 80);
    }

    #[test]
    fn test_invalid_values() {
        let fast = SpeechConfig {
            rate: 0.0,
            ..SpeechConfig::default()
        };
        assert!(fast.validate().is_err());
        let loud = SpeechConfig {
            volume: 1.5,
            ..SpeechConfig::default()
        };
        assert!(loud.validate().is_err());
        let low = SpeechConfig {
            pitch: -2.0,
            ..SpeechConfig::default()
        };
        assert!(low.validate().is_err());

        let mut config = SpeechConfig::default();
        config.voice.language = "en US".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_names_deserialize_lowercase() {
        let config: SpeechConfig = serde_json::from_str(r#"{"engine": "console"}"#).unwrap();
        assert_eq!(config.engine, TtsEngine::Console);
    }
}
