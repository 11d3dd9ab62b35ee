//! vassist-pipeline: the detection and narration pipeline
//!
//! External callbacks (button presses, recognized speech, display refresh,
//! finished detections) become typed [`Event`]s on one queue. A single
//! consumer, [`PipelineRuntime`], feeds each event to the pure
//! [`LoopController`] state machine and carries out the [`Effect`]s it
//! returns.

pub mod error;
pub mod config;
pub mod event;
pub mod chat;
pub mod controller;
pub mod runtime;
pub mod profile_setup;

pub use error::PipelineError;
pub use config::PipelineConfig;
pub use event::{DetectionSource, Event, Tab};
pub use chat::{ChatMessage, ChatSession, Speaker};
pub use controller::{Effect, LoopController, LoopState};
pub use runtime::{PipelineHandle, PipelineRuntime};
pub use profile_setup::{resume_profile_setup, run_profile_setup, ProfileSetup, SetupStep};
