//! Application context injected into components that need shared state

use crate::error::{Error, Result};
use crate::profile::{ProfileStore, UserProfile};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared mute switch. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct MuteFlag(Arc<AtomicBool>);

impl MuteFlag {
    pub fn new(muted: bool) -> Self {
        Self(Arc::new(AtomicBool::new(muted)))
    }

    pub fn is_muted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, muted: bool) {
        self.0.store(muted, Ordering::Release);
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

/// Process-wide state that used to live in globals: the stored profile
/// and the narration mute flag.
///
/// The profile is read once at startup (`load`) and written once when
/// setup finishes (`complete_profile`).
pub struct AppContext {
    profile: RwLock<Option<UserProfile>>,
    muted: MuteFlag,
}

impl AppContext {
    /// Context with no profile and narration unmuted
    pub fn new() -> Self {
        Self {
            profile: RwLock::new(None),
            muted: MuteFlag::default(),
        }
    }

    /// Startup lifecycle point: read the stored profile, if any
    pub fn load(store: &dyn ProfileStore) -> Result<Self> {
        let profile = store.load()?;
        match &profile {
            Some(p) => info!("Loaded profile for {}", p.name),
            None => info!("No stored profile, setup required"),
        }
        Ok(Self {
            profile: RwLock::new(profile),
            muted: MuteFlag::default(),
        })
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    pub fn has_profile(&self) -> bool {
        self.profile.read().is_some()
    }

    /// Completion lifecycle point: persist and adopt the captured profile
    pub fn complete_profile(&self, profile: UserProfile, store: &dyn ProfileStore) -> Result<()> {
        if !profile.is_complete() {
            return Err(Error::Profile("Profile is missing required fields".to_string()));
        }
        store.save(&profile)?;
        *self.profile.write() = Some(profile);
        Ok(())
    }

    pub fn mute_flag(&self) -> MuteFlag {
        self.muted.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.is_muted()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
