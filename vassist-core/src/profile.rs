//! User profile record and its key-value storage boundary

use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Profile captured once during first-run setup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: String,
    #[serde(rename = "emergencyContact")]
    pub emergency_contact: String,
}

impl UserProfile {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.age.trim().is_empty()
            && !self.emergency_contact.trim().is_empty()
    }
}

/// Persistent storage for the profile record
pub trait ProfileStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<UserProfile>>;

    fn save(&self, profile: &UserProfile) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Profile stored as a single JSON document on disk
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/vassist/profile.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|mut p| {
                p.push("vassist");
                p.push("profile.json");
                p
            })
            .unwrap_or_else(|| PathBuf::from("./profile.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self) -> Result<Option<UserProfile>> {
        if !self.path.exists() {
            debug!("No profile at {}", self.path.display());
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let profile = serde_json::from_str(&raw)
            .map_err(|e| Error::Deserialization(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(profile))
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        // Write-then-rename so a crash never leaves a truncated profile
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        info!("Profile saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryProfileStore {
    slot: RwLock<Option<UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            slot: RwLock::new(Some(profile)),
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<UserProfile>> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        *self.slot.write() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write() = None;
        Ok(())
    }
}
