//! Listening session management

use crate::config::ListenConfig;
use crate::error::AudioError;
use crate::recognizers::{SpeechRecognizer, Transcript};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What a listening session reports to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    Transcript(Transcript),
    /// The session failed and has ended
    Failed(String),
}

struct Session {
    stop: oneshot::Sender<()>,
    active: Arc<AtomicBool>,
    handle: JoinHandle<Box<dyn SpeechRecognizer>>,
}

/// Owns a recognizer and runs at most one listening session with it.
///
/// A recognition failure ends the session and is reported once; nothing
/// restarts it until the owner calls [`VoiceListener::start`] again.
pub struct VoiceListener {
    config: ListenConfig,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    session: Option<Session>,
}

impl VoiceListener {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        config: ListenConfig,
    ) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::Config)?;
        Ok(Self {
            config,
            recognizer: Some(recognizer),
            session: None,
        })
    }

    pub fn is_listening(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.active.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Start a session that forwards results into `sink`.
    pub async fn start<E>(&mut self, sink: mpsc::Sender<E>) -> Result<(), AudioError>
    where
        E: From<ListenerEvent> + Send + 'static,
    {
        if self.is_listening() {
            return Err(AudioError::AlreadyListening);
        }
        self.reclaim().await?;

        let recognizer = self
            .recognizer
            .take()
            .ok_or_else(|| {
                AudioError::Recognition("Recognizer lost by a previous session".to_string())
            })?;

        let (stop, stop_rx) = oneshot::channel();
        let active = Arc::new(AtomicBool::new(true));
        info!("Listening with '{}' recognizer ({})", recognizer.name(), self.config.language);
        let handle = tokio::spawn(run_session(
            recognizer,
            sink,
            stop_rx,
            active.clone(),
            self.config.continuous,
        ));

        self.session = Some(Session {
            stop,
            active,
            handle,
        });
        Ok(())
    }

    /// End the current session, if any
    pub async fn stop(&mut self) -> Result<(), AudioError> {
        if self.end_session().await? {
            debug!("Listening session stopped");
        }
        Ok(())
    }

    /// Take the recognizer back from a session that has already ended
    async fn reclaim(&mut self) -> Result<(), AudioError> {
        self.end_session().await.map(|_| ())
    }

    /// Signal the session task and join it. The signal also releases a task
    /// still waiting to hand its last result to a full sink.
    async fn end_session(&mut self) -> Result<bool, AudioError> {
        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        session.active.store(false, Ordering::Release);
        let _ = session.stop.send(());
        self.recognizer = Some(join_session(session.handle).await?);
        Ok(true)
    }
}

async fn join_session(
    handle: JoinHandle<Box<dyn SpeechRecognizer>>,
) -> Result<Box<dyn SpeechRecognizer>, AudioError> {
    handle
        .await
        .map_err(|e| AudioError::Recognition(format!("Listening task failed: {}", e)))
}

async fn run_session<E>(
    mut recognizer: Box<dyn SpeechRecognizer>,
    sink: mpsc::Sender<E>,
    mut stop: oneshot::Receiver<()>,
    active: Arc<AtomicBool>,
    continuous: bool,
) -> Box<dyn SpeechRecognizer>
where
    E: From<ListenerEvent> + Send + 'static,
{
    loop {
        let result = tokio::select! {
            _ = &mut stop => break,
            result = recognizer.recognize() => result,
        };

        let (event, ends) = match result {
            Ok(transcript) => {
                debug!("Heard: {}", transcript.text);
                (ListenerEvent::Transcript(transcript), !continuous)
            }
            Err(e) => {
                warn!("Speech recognition failed: {}", e);
                (ListenerEvent::Failed(e.to_string()), true)
            }
        };
        // Mark the session over before reporting so a restart from the
        // event handler is accepted.
        if ends {
            active.store(false, Ordering::Release);
        }

        let delivered = tokio::select! {
            _ = &mut stop => false,
            sent = sink.send(E::from(event)) => sent.is_ok(),
        };
        if !delivered {
            debug!("Listener result not delivered, session ending");
            break;
        }
        if ends {
            break;
        }
    }
    active.store(false, Ordering::Release);
    recognizer
}
