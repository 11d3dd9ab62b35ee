//! End-to-end runs of the pipeline with in-memory collaborators

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use vassist_core::{Detection, Frame, MuteFlag, NarrationMode};
use vassist_eye::{
    DetectionAdapter, FrameRenderer, FrameSlot, FrameSource, LatestOverlay, ObjectDetector,
    ScriptedDetector, VisionConfig, VisionError,
};
use vassist_pipeline::controller::{
    CAMERA_NOT_READY, LIVE_STOPPED, MODEL_LOADING, MODEL_READY, RECOGNITION_FAILED,
};
use vassist_pipeline::{
    Event, LoopState, PipelineConfig, PipelineError, PipelineHandle, PipelineRuntime, Tab,
};
use vassist_sc::{ListenConfig, ScriptedRecognizer, VoiceListener};
use vassist_spk::{NarrationService, RecordingSynthesizer, SpeechConfig};

/// Detector that blocks each call until a permit is released and tracks
/// how many calls overlap.
struct GatedDetector {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    gate: Semaphore,
}

impl GatedDetector {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }

    fn open() -> Self {
        let detector = Self::new();
        detector.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        detector
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl ObjectDetector for GatedDetector {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn load(&self) -> Result<(), VisionError> {
        Ok(())
    }

    async fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| VisionError::DetectionFailure(e.to_string()));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        permit?.forget();

        Ok(vec![Detection::new("person", 0.92, (10.0, 50.0, 100.0, 200.0))])
    }
}

struct Harness {
    handle: PipelineHandle,
    speech: Arc<RecordingSynthesizer>,
    overlay: Arc<LatestOverlay>,
    task: JoinHandle<Result<(), PipelineError>>,
}

impl Harness {
    fn spoken(&self) -> Vec<String> {
        self.speech.spoken()
    }

    /// Wait until every event sent so far has been handled
    async fn sync(&self, marker: &str) {
        self.handle.say(marker).await.unwrap();
        let speech = self.speech.clone();
        let marker = marker.to_string();
        eventually(move || speech.spoken().contains(&marker)).await;
    }
}

async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn start(
    detector: Arc<dyn ObjectDetector>,
    frames: Arc<dyn FrameSource>,
    preload: bool,
    listener: Option<VoiceListener>,
) -> Harness {
    let adapter = Arc::new(DetectionAdapter::new(detector, VisionConfig::default()).unwrap());
    if preload {
        adapter.load().await.unwrap();
    }
    let speech = Arc::new(RecordingSynthesizer::new());
    let narrator = Arc::new(
        NarrationService::new(speech.clone(), &SpeechConfig::default(), MuteFlag::default())
            .unwrap(),
    );
    let overlay = Arc::new(LatestOverlay::new());

    let mut runtime = PipelineRuntime::new(
        &PipelineConfig::default(),
        adapter,
        frames,
        narrator,
        FrameRenderer::default(),
        overlay.clone(),
    )
    .unwrap();
    if let Some(listener) = listener {
        runtime = runtime.with_listener(listener);
    }
    if !preload {
        runtime.load_model();
    }

    let handle = runtime.handle();
    let task = tokio::spawn(runtime.run());
    Harness {
        handle,
        speech,
        overlay,
        task,
    }
}

fn camera() -> Arc<dyn FrameSource> {
    Arc::new(FrameSlot::with_frame(Frame::blank(300, 200)))
}

#[tokio::test]
async fn test_concurrent_requests_make_one_engine_call() {
    let detector = Arc::new(GatedDetector::new());
    let mut h = start(detector.clone(), camera(), true, None).await;

    h.handle.detect(NarrationMode::Quick).await.unwrap();
    h.handle.wait_for_state(LoopState::Detecting).await.unwrap();
    for _ in 0..5 {
        h.handle.detect(NarrationMode::Detailed).await.unwrap();
        h.handle.send(Event::Transcript("describe".to_string())).await.unwrap();
    }
    h.sync("sync").await;
    assert_eq!(detector.calls(), 1);

    detector.release(1);
    h.handle.wait_for_state(LoopState::Idle).await.unwrap();
    let speech = h.speech.clone();
    eventually(move || {
        speech
            .spoken()
            .iter()
            .any(|s| s == "I see person with 92% confidence")
    })
    .await;

    assert_eq!(detector.calls(), 1);
    assert_eq!(h.overlay.presented(), 1);
    assert_eq!(h.speech.audible(), vec!["I see person with 92% confidence"]);
}

#[tokio::test]
async fn test_toggle_off_lets_in_flight_detection_finish() {
    let detector = Arc::new(GatedDetector::new());
    let mut h = start(detector.clone(), camera(), true, None).await;

    h.handle.toggle_live().await.unwrap();
    h.handle.wait_for_state(LoopState::Detecting).await.unwrap();
    h.handle.toggle_live().await.unwrap();
    h.sync("sync").await;

    detector.release(10);
    h.handle.wait_for_state(LoopState::Idle).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(detector.calls(), 1);
    assert_eq!(h.overlay.presented(), 1);
    let spoken = h.spoken();
    assert!(spoken.contains(&LIVE_STOPPED.to_string()));
    assert_eq!(spoken.last().map(String::as_str), Some("I see person with 92% confidence"));
}

#[tokio::test]
async fn test_live_mode_cycles_without_overlap() {
    let detector = Arc::new(GatedDetector::open());
    let h = start(detector.clone(), camera(), true, None).await;

    h.handle.toggle_live().await.unwrap();
    let d = detector.clone();
    eventually(move || d.calls() >= 5).await;

    h.handle.toggle_live().await.unwrap();
    h.sync("sync").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = detector.calls();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(detector.calls(), settled);
    assert_eq!(detector.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(h.handle.state(), LoopState::Idle);
}

#[tokio::test]
async fn test_missing_frame_is_narrated() {
    let detector = Arc::new(GatedDetector::open());
    let mut h = start(detector.clone(), Arc::new(FrameSlot::new()), true, None).await;

    h.handle.detect(NarrationMode::Quick).await.unwrap();
    let speech = h.speech.clone();
    eventually(move || speech.spoken().contains(&CAMERA_NOT_READY.to_string())).await;
    h.handle.wait_for_state(LoopState::Idle).await.unwrap();
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_muted_results_render_silently() {
    let detector = Arc::new(GatedDetector::open());
    let h = start(detector, camera(), true, None).await;

    h.handle.toggle_mute().await.unwrap();
    h.handle.detect(NarrationMode::Quick).await.unwrap();
    let overlay = h.overlay.clone();
    eventually(move || overlay.presented() == 1).await;

    h.handle.toggle_mute().await.unwrap();
    h.sync("sync").await;
    assert_eq!(h.spoken(), vec!["sync"]);
}

#[tokio::test(start_paused = true)]
async fn test_model_loading_then_ready() {
    let detector = Arc::new(
        ScriptedDetector::new(vec![vec![]]).with_latency(Duration::from_secs(2), Duration::ZERO),
    );
    let h = start(detector, camera(), false, None).await;

    h.handle.detect(NarrationMode::Quick).await.unwrap();
    let speech = h.speech.clone();
    eventually(move || speech.spoken().contains(&MODEL_LOADING.to_string())).await;

    let speech = h.speech.clone();
    eventually(move || speech.spoken().contains(&MODEL_READY.to_string())).await;

    h.handle.detect(NarrationMode::Quick).await.unwrap();
    let speech = h.speech.clone();
    eventually(move || speech.spoken().contains(&"No objects detected in view".to_string())).await;
}

#[tokio::test(start_paused = true)]
async fn test_chat_reply_waits_before_speaking() {
    let detector = Arc::new(GatedDetector::open());
    let h = start(detector, camera(), true, None).await;

    h.handle.select_tab(Tab::Chat).await.unwrap();
    h.handle.send(Event::Transcript("hello".to_string())).await.unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(h.spoken().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.spoken(), vec!["Hello! How can I help you today?"]);
}

#[tokio::test]
async fn test_voice_commands_and_recognition_failure() {
    let recognizer = ScriptedRecognizer::new(["please describe"]).then_fail("no-speech");
    let listener = VoiceListener::new(Box::new(recognizer), ListenConfig::default()).unwrap();
    let detector = Arc::new(GatedDetector::open());
    let h = start(detector.clone(), camera(), true, Some(listener)).await;

    h.handle.start_listening().await.unwrap();

    let speech = h.speech.clone();
    eventually(move || {
        let spoken = speech.spoken();
        spoken.contains(&"Detailed view: person on the left".to_string())
            && spoken.contains(&RECOGNITION_FAILED.to_string())
    })
    .await;
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn test_shutdown_closes_handle() {
    let h = start(Arc::new(GatedDetector::open()), camera(), true, None).await;

    h.handle.shutdown().await.unwrap();
    h.task.await.unwrap().unwrap();
    assert!(matches!(
        h.handle.detect(NarrationMode::Quick).await,
        Err(PipelineError::Closed)
    ));
}
