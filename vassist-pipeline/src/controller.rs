//! Detection loop controller
//!
//! A synchronous state machine: each [`Event`] goes in, a list of
//! [`Effect`]s comes out. It never touches hardware or spawns work, which
//! keeps every transition testable in isolation. At most one detection is
//! in flight; requests that arrive meanwhile are dropped, not queued.

use crate::chat::ChatSession;
use crate::config::PipelineConfig;
use crate::event::{DetectionSource, Event, Tab};
use std::time::Duration;
use tracing::{debug, info, warn};
use vassist_core::NarrationMode;
use vassist_eye::{DetectionReport, NarrationFormatter, VisionError};
use vassist_sc::{VoiceCommand, VoiceCommandDispatcher};

pub const MODEL_READY: &str =
    "Vision system ready. You can say \"detect\" or \"describe\" to analyze your surroundings.";
pub const MODEL_FAILED: &str =
    "Failed to initialize vision system. Please restart the application.";
pub const MODEL_LOADING: &str = "The vision system is still loading. Please try again in a moment.";
pub const DETECTION_ERROR: &str = "Sorry, there was an error processing the image";
pub const CAMERA_NOT_READY: &str = "The camera is not ready yet";
pub const RECOGNITION_FAILED: &str =
    "Sorry, I could not hear that. Say start listening to try again.";
pub const LIVE_STARTED: &str = "Starting live detection";
pub const LIVE_STOPPED: &str = "Stopping live detection";

/// Observable loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    /// A detection request is in flight
    Detecting,
    /// Live mode is on and no request is in flight
    LiveRunning,
}

/// Work the runtime must carry out, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Capture the current frame and run detection on it
    Detect(NarrationMode),
    /// Draw the detections over the live view
    Render(DetectionReport),
    Narrate(String),
    /// Deliver `DisplayRefresh` after one display frame
    ScheduleRefresh,
    /// Deliver `Say(text)` after the delay
    NarrateAfter(Duration, String),
    SetMuted(bool),
    StartListening,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Detecting,
}

pub struct LoopController {
    phase: Phase,
    live: bool,
    /// A `DisplayRefresh` is already on its way
    refresh_pending: bool,
    /// Last error narrated during this live run, to avoid repeating it every frame
    last_live_error: Option<String>,
    muted: bool,
    tab: Tab,
    chat: ChatSession,
    dispatcher: VoiceCommandDispatcher,
    chat_reply_delay: Duration,
}

impl LoopController {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            phase: Phase::Idle,
            live: false,
            refresh_pending: false,
            last_live_error: None,
            muted: config.start_muted,
            tab: Tab::Camera,
            chat: ChatSession::new(),
            dispatcher: VoiceCommandDispatcher::new(),
            chat_reply_delay: config.chat_reply_delay(),
        }
    }

    pub fn state(&self) -> LoopState {
        match (self.phase, self.live) {
            (Phase::Detecting, _) => LoopState::Detecting,
            (Phase::Idle, true) => LoopState::LiveRunning,
            (Phase::Idle, false) => LoopState::Idle,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let before = self.state();
        let effects = match event {
            Event::DetectRequested { mode, source } => self.request_detection(mode, source),
            Event::ToggleLive => self.toggle_live(),
            Event::DisplayRefresh => self.display_refresh(),
            Event::DetectionCompleted { mode, outcome } => self.detection_completed(mode, outcome),
            Event::ModelLoaded(Ok(())) => vec![Effect::Narrate(MODEL_READY.to_string())],
            Event::ModelLoaded(Err(message)) => {
                warn!("Vision system failed to initialize: {}", message);
                vec![Effect::Narrate(MODEL_FAILED.to_string())]
            }
            Event::Transcript(text) => self.transcript(&text),
            Event::RecognitionFailed(message) => {
                debug!("Listening stopped after failure: {}", message);
                vec![Effect::Narrate(RECOGNITION_FAILED.to_string())]
            }
            Event::StartListening => vec![Effect::StartListening],
            Event::SetMuted(muted) => {
                self.muted = muted;
                vec![Effect::SetMuted(muted)]
            }
            Event::ToggleMute => {
                self.muted = !self.muted;
                vec![Effect::SetMuted(self.muted)]
            }
            Event::SelectTab(tab) => self.select_tab(tab),
            Event::Say(text) => vec![Effect::Narrate(text)],
            Event::Shutdown => {
                self.live = false;
                vec![Effect::Stop]
            }
        };

        let after = self.state();
        if before != after {
            debug!("Loop state {:?} -> {:?}", before, after);
        }
        effects
    }

    fn request_detection(&mut self, mode: NarrationMode, source: DetectionSource) -> Vec<Effect> {
        if self.phase == Phase::Detecting {
            debug!("Dropping {:?} {:?} request, detection in flight", source, mode);
            return Vec::new();
        }
        self.phase = Phase::Detecting;
        vec![Effect::Detect(mode)]
    }

    fn toggle_live(&mut self) -> Vec<Effect> {
        self.live = !self.live;
        self.last_live_error = None;

        if !self.live {
            info!("Live detection stopped");
            return vec![Effect::Narrate(LIVE_STOPPED.to_string())];
        }

        info!("Live detection started");
        let mut effects = vec![Effect::Narrate(LIVE_STARTED.to_string())];
        // With a detection in flight the completion continues the cycle
        if self.phase == Phase::Idle && !self.refresh_pending {
            self.phase = Phase::Detecting;
            effects.push(Effect::Detect(NarrationMode::Quick));
        }
        effects
    }

    fn display_refresh(&mut self) -> Vec<Effect> {
        self.refresh_pending = false;
        if !self.live || self.phase == Phase::Detecting {
            return Vec::new();
        }
        self.phase = Phase::Detecting;
        vec![Effect::Detect(NarrationMode::Quick)]
    }

    fn detection_completed(
        &mut self,
        mode: NarrationMode,
        outcome: Result<DetectionReport, VisionError>,
    ) -> Vec<Effect> {
        if self.phase != Phase::Detecting {
            warn!("Detection result arrived with nothing in flight, ignoring");
            return Vec::new();
        }
        self.phase = Phase::Idle;

        let mut effects = Vec::new();
        match outcome {
            Ok(report) => {
                self.last_live_error = None;
                let narration =
                    NarrationFormatter::format(mode, &report.detections, report.frame_width);
                effects.push(Effect::Render(report));
                effects.push(Effect::Narrate(narration));
            }
            Err(e) => {
                warn!("Detection failed: {}", e);
                let message = error_narration(&e).to_string();
                if self.live {
                    if self.last_live_error.as_deref() != Some(message.as_str()) {
                        self.last_live_error = Some(message.clone());
                        effects.push(Effect::Narrate(message));
                    }
                } else {
                    effects.push(Effect::Narrate(message));
                }
            }
        }

        if self.live && !self.refresh_pending {
            self.refresh_pending = true;
            effects.push(Effect::ScheduleRefresh);
        }
        effects
    }

    fn transcript(&mut self, text: &str) -> Vec<Effect> {
        match self.tab {
            Tab::Camera => match self.dispatcher.dispatch(text) {
                Some(VoiceCommand::ToggleLive) => self.toggle_live(),
                Some(command) => match command.mode() {
                    Some(mode) => self.request_detection(mode, DetectionSource::Voice),
                    None => Vec::new(),
                },
                None => Vec::new(),
            },
            Tab::Chat => {
                let reply = self.chat.handle_utterance(text);
                vec![Effect::NarrateAfter(self.chat_reply_delay, reply)]
            }
        }
    }

    fn select_tab(&mut self, tab: Tab) -> Vec<Effect> {
        if self.tab == tab {
            return Vec::new();
        }
        info!("Switched to {} view", tab);
        self.tab = tab;
        // The live view goes away with the camera tab
        if tab == Tab::Chat && self.live {
            self.live = false;
            self.last_live_error = None;
            debug!("Live detection stopped by leaving the camera view");
        }
        Vec::new()
    }
}

/// Spoken message for a failed detection
pub fn error_narration(error: &VisionError) -> &'static str {
    match error {
        VisionError::ModelUnavailable => MODEL_LOADING,
        VisionError::Camera(_) => CAMERA_NOT_READY,
        _ => DETECTION_ERROR,
    }
}
