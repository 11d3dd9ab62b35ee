//! Application configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use vassist_core::JsonProfileStore;
use vassist_eye::VisionConfig;
use vassist_pipeline::PipelineConfig;
use vassist_sc::ListenConfig;
use vassist_spk::SpeechConfig;

/// Everything the binary reads from `vassist.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vision: VisionConfig,
    pub speech: SpeechConfig,
    pub listen: ListenConfig,
    pub pipeline: PipelineConfig,
    /// Where the profile is stored (defaults to the user data dir)
    pub profile_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::from_toml(&content).with_context(|| format!("loading {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.vision.validate().map_err(anyhow::Error::msg).context("[vision]")?;
        self.speech.validate().map_err(anyhow::Error::msg).context("[speech]")?;
        self.listen.validate().map_err(anyhow::Error::msg).context("[listen]")?;
        self.pipeline.validate().map_err(anyhow::Error::msg).context("[pipeline]")?;
        Ok(())
    }

    pub fn profile_store(&self) -> JsonProfileStore {
        JsonProfileStore::new(
            self.profile_path
                .clone()
                .unwrap_or_else(JsonProfileStore::default_path),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vassist_spk::TtsEngine;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.pipeline.refresh_rate_hz, 60);
        assert!(config.profile_path.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            profile_path = "/tmp/vassist-profile.json"

            [speech]
            engine = "console"
            rate = 1.5

            [pipeline]
            chat_reply_delay_ms = 250

            [vision]
            resolution = [1280, 720]
            "#,
        )
        .unwrap();

        assert_eq!(config.speech.engine, TtsEngine::Console);
        assert_eq!(config.speech.volume, 1.0);
        assert_eq!(config.pipeline.chat_reply_delay_ms, 250);
        assert_eq!(config.vision.resolution, (1280, 720));
        assert_eq!(config.profile_store().path(), Path::new("/tmp/vassist-profile.json"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml("[pipeline]\nrefresh_rate_hz = 0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("[pipeline]"));
    }
}
