//! First-run profile capture by voice

use crate::error::PipelineError;
use tracing::{info, warn};
use vassist_core::{AppContext, ProfileStore, UserProfile};
use vassist_sc::{AudioError, SpeechRecognizer};
use vassist_spk::NarrationService;

pub const SETUP_COMPLETE: &str = "Profile setup complete. Welcome to Vision Assist!";
pub const ANSWER_NOT_HEARD: &str =
    "Sorry, I could not hear that. Say your answer again when you are ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Name,
    Age,
    EmergencyContact,
    Done,
}

impl SetupStep {
    /// Question asked at this step
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            SetupStep::Name => Some("Please say your name"),
            SetupStep::Age => Some("Please say your age"),
            SetupStep::EmergencyContact => Some("Please say your emergency contact number"),
            SetupStep::Done => None,
        }
    }
}

/// Collects one answer per step
#[derive(Debug)]
pub struct ProfileSetup {
    step: SetupStep,
    profile: UserProfile,
}

impl Default for ProfileSetup {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileSetup {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Name,
            profile: UserProfile::default(),
        }
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    /// Store the answer for the current step and advance.
    ///
    /// Returns the finished profile once the last answer is in.
    pub fn record(&mut self, answer: &str) -> Option<UserProfile> {
        let answer = answer.trim().to_string();
        self.step = match self.step {
            SetupStep::Name => {
                self.profile.name = answer;
                SetupStep::Age
            }
            SetupStep::Age => {
                self.profile.age = answer;
                SetupStep::EmergencyContact
            }
            SetupStep::EmergencyContact => {
                self.profile.emergency_contact = answer;
                SetupStep::Done
            }
            SetupStep::Done => SetupStep::Done,
        };

        (self.step == SetupStep::Done).then(|| self.profile.clone())
    }
}

/// Ask the three questions, save the profile and welcome the user.
pub async fn run_profile_setup(
    recognizer: &mut dyn SpeechRecognizer,
    narrator: &NarrationService,
    ctx: &AppContext,
    store: &dyn ProfileStore,
) -> Result<UserProfile, PipelineError> {
    let mut setup = ProfileSetup::new();
    resume_profile_setup(&mut setup, recognizer, narrator, ctx, store).await
}

/// Continue setup from its current step.
///
/// A failed or blank answer is announced once and returned without asking
/// again; calling this again with the same `setup` picks up at the
/// unanswered question.
pub async fn resume_profile_setup(
    setup: &mut ProfileSetup,
    recognizer: &mut dyn SpeechRecognizer,
    narrator: &NarrationService,
    ctx: &AppContext,
    store: &dyn ProfileStore,
) -> Result<UserProfile, PipelineError> {
    info!("Profile setup at {:?}", setup.step());

    while let Some(prompt) = setup.step().prompt() {
        if let Err(e) = narrator.speak(prompt) {
            warn!("Could not ask '{}': {}", prompt, e);
        }

        let heard = recognizer.recognize().await.and_then(|t| {
            if t.text.trim().is_empty() {
                Err(AudioError::Recognition("Empty answer".to_string()))
            } else {
                Ok(t.text)
            }
        });
        let answer = match heard {
            Ok(text) => text,
            Err(AudioError::InputClosed) => return Err(AudioError::InputClosed.into()),
            Err(e) => {
                warn!("Profile answer not recognized: {}", e);
                if let Err(speak_err) = narrator.speak(ANSWER_NOT_HEARD) {
                    warn!("Could not report recognition failure: {}", speak_err);
                }
                return Err(e.into());
            }
        };

        if let Some(profile) = setup.record(&answer) {
            ctx.complete_profile(profile.clone(), store)?;
            info!("Profile saved for {}", profile.name);
            if let Err(e) = narrator.speak(SETUP_COMPLETE) {
                warn!("Could not confirm profile setup: {}", e);
            }
            return Ok(profile);
        }
    }

    Err(PipelineError::Config("Profile setup is already complete".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_in_order() {
        let mut setup = ProfileSetup::new();
        assert_eq!(setup.step().prompt(), Some("Please say your name"));
        assert!(setup.record("Ada").is_none());
        assert_eq!(setup.step(), SetupStep::Age);
        assert!(setup.record(" 36 ").is_none());
        assert_eq!(setup.step().prompt(), Some("Please say your emergency contact number"));

        let profile = setup.record("555 0100").unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.age, "36");
        assert_eq!(profile.emergency_contact, "555 0100");
        assert_eq!(setup.step(), SetupStep::Done);
        assert_eq!(setup.step().prompt(), None);
    }
}
