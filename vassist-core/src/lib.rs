//! vassist-core: shared types for the Vision Assist workspace
//!
//! Holds the detection data model, the core error type and the
//! application context (user profile + mute flag) that is injected into
//! the narration and pipeline crates instead of living in global state.

pub mod types;
pub mod error;
pub mod context;
pub mod profile;

pub use error::{Error, Result};
pub use types::{BoundingBox, Detection, Frame, NarrationMode};
pub use context::{AppContext, MuteFlag};
pub use profile::{JsonProfileStore, MemoryProfileStore, ProfileStore, UserProfile};
