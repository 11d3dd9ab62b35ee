//! Single-consumer event loop around the controller

use crate::config::PipelineConfig;
use crate::controller::{Effect, LoopController, LoopState};
use crate::error::PipelineError;
use crate::event::{DetectionSource, Event, Tab};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use vassist_core::NarrationMode;
use vassist_eye::{DetectionAdapter, FrameRenderer, FrameSource, OverlaySink};
use vassist_sc::{AudioError, VoiceListener};
use vassist_spk::NarrationService;

/// Clonable handle for feeding events into a running pipeline
#[derive(Clone)]
pub struct PipelineHandle {
    tx: mpsc::Sender<Event>,
    state: watch::Receiver<LoopState>,
}

impl PipelineHandle {
    pub async fn send(&self, event: Event) -> Result<(), PipelineError> {
        self.tx.send(event).await.map_err(|_| PipelineError::Closed)
    }

    pub async fn detect(&self, mode: NarrationMode) -> Result<(), PipelineError> {
        self.send(Event::DetectRequested {
            mode,
            source: DetectionSource::Manual,
        })
        .await
    }

    pub async fn toggle_live(&self) -> Result<(), PipelineError> {
        self.send(Event::ToggleLive).await
    }

    pub async fn toggle_mute(&self) -> Result<(), PipelineError> {
        self.send(Event::ToggleMute).await
    }

    pub async fn select_tab(&self, tab: Tab) -> Result<(), PipelineError> {
        self.send(Event::SelectTab(tab)).await
    }

    pub async fn start_listening(&self) -> Result<(), PipelineError> {
        self.send(Event::StartListening).await
    }

    pub async fn say(&self, text: impl Into<String>) -> Result<(), PipelineError> {
        self.send(Event::Say(text.into())).await
    }

    pub async fn shutdown(&self) -> Result<(), PipelineError> {
        self.send(Event::Shutdown).await
    }

    /// Loop state after the most recently handled event
    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    /// Wait until the loop reaches `target`
    pub async fn wait_for_state(&mut self, target: LoopState) -> Result<(), PipelineError> {
        self.state
            .wait_for(|s| *s == target)
            .await
            .map(|_| ())
            .map_err(|_| PipelineError::Closed)
    }
}

/// Owns the collaborators and applies the controller's effects.
pub struct PipelineRuntime {
    controller: LoopController,
    adapter: Arc<DetectionAdapter>,
    frames: Arc<dyn FrameSource>,
    narrator: Arc<NarrationService>,
    renderer: FrameRenderer,
    overlay: Arc<dyn OverlaySink>,
    listener: Option<VoiceListener>,
    refresh_interval: Duration,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    state: watch::Sender<LoopState>,
}

impl PipelineRuntime {
    pub fn new(
        config: &PipelineConfig,
        adapter: Arc<DetectionAdapter>,
        frames: Arc<dyn FrameSource>,
        narrator: Arc<NarrationService>,
        renderer: FrameRenderer,
        overlay: Arc<dyn OverlaySink>,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let (tx, rx) = mpsc::channel(config.event_queue_size);
        let controller = LoopController::new(config);
        let (state, _) = watch::channel(controller.state());
        narrator.set_muted(config.start_muted);

        Ok(Self {
            controller,
            adapter,
            frames,
            narrator,
            renderer,
            overlay,
            listener: None,
            refresh_interval: config.refresh_interval(),
            tx,
            rx,
            state,
        })
    }

    /// Route recognized speech into the pipeline
    pub fn with_listener(mut self, listener: VoiceListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn handle(&self) -> PipelineHandle {
        PipelineHandle {
            tx: self.tx.clone(),
            state: self.state.subscribe(),
        }
    }

    /// Load the detection engine in the background and report the result
    /// as `ModelLoaded`.
    pub fn load_model(&self) {
        let adapter = self.adapter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = adapter.load().await.map_err(|e| e.to_string());
            let _ = tx.send(Event::ModelLoaded(result)).await;
        });
    }

    /// Consume events until `Shutdown`.
    pub async fn run(mut self) -> Result<(), PipelineError> {
        info!("Pipeline running");
        while let Some(event) = self.rx.recv().await {
            let effects = self.controller.handle(event);
            self.state.send_replace(self.controller.state());

            let mut stop = false;
            for effect in effects {
                if effect == Effect::Stop {
                    stop = true;
                    continue;
                }
                self.apply(effect).await;
            }
            if stop {
                break;
            }
        }

        // Closing the queue releases any task blocked on a full queue,
        // including a listening session being joined below.
        self.rx.close();
        if let Some(listener) = self.listener.as_mut() {
            listener.stop().await?;
        }
        self.narrator.silence();
        info!("Pipeline stopped");
        Ok(())
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Detect(mode) => self.spawn_detection(mode),
            Effect::Render(report) => {
                let overlay = self
                    .renderer
                    .render(&report.detections, report.frame_width, report.frame_height);
                self.overlay.present(&overlay);
            }
            Effect::Narrate(text) => {
                if let Err(e) = self.narrator.speak(&text) {
                    warn!("Narration failed: {}", e);
                }
            }
            Effect::ScheduleRefresh => {
                self.send_after(self.refresh_interval, Event::DisplayRefresh)
            }
            Effect::NarrateAfter(delay, text) => self.send_after(delay, Event::Say(text)),
            Effect::SetMuted(muted) => self.narrator.set_muted(muted),
            Effect::StartListening => self.start_listening().await,
            Effect::Stop => {}
        }
    }

    fn spawn_detection(&self, mode: NarrationMode) {
        let adapter = self.adapter.clone();
        let frames = self.frames.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match frames.capture_frame() {
                Ok(frame) => adapter.detect(&frame).await,
                Err(e) => Err(e),
            };
            if tx.send(Event::DetectionCompleted { mode, outcome }).await.is_err() {
                debug!("Pipeline stopped before detection finished");
            }
        });
    }

    fn send_after(&self, delay: Duration, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event).await;
        });
    }

    async fn start_listening(&mut self) {
        let Some(listener) = self.listener.as_mut() else {
            debug!("No voice input configured");
            return;
        };
        match listener.start(self.tx.clone()).await {
            Ok(()) => {}
            Err(AudioError::AlreadyListening) => debug!("Already listening"),
            Err(e) => warn!("Could not start listening: {}", e),
        }
    }
}
