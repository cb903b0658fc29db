use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use scanlate_types::SpeechPolicy;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{SpeechEngine, Utterance};

/// Pending utterances beyond this are dropped
const UTTERANCE_CAPACITY: usize = 16;

/// Fire-and-forget handle to the speech worker
#[derive(Clone)]
pub struct Announcer {
    tx: Option<AsyncSender<Utterance>>,
}

impl Announcer {
    /// Start the speech worker; it stops when `cancel` fires or every
    /// handle is dropped
    pub fn spawn(
        engine: Arc<dyn SpeechEngine>,
        policy: SpeechPolicy,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = kanal::bounded_async(UTTERANCE_CAPACITY);
        tracing::info!("Speech worker using '{}' engine, {:?} policy", engine.name(), policy);
        let worker = tokio::spawn(speech_worker(rx, engine, policy, cancel));
        (Self { tx: Some(tx) }, worker)
    }

    /// Handle that never speaks
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue `text` for speaking without waiting; returns whether it was queued
    pub fn announce(&self, text: &str, language: &str) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };

        if text.trim().is_empty() {
            tracing::debug!("Nothing to announce");
            return false;
        }

        let utterance = Utterance {
            text: text.to_string(),
            language: language.to_string(),
        };

        match tx.try_send(utterance) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Speech queue full, dropping utterance");
                false
            }
            Err(e) => {
                tracing::warn!("Speech worker gone: {}", e);
                false
            }
        }
    }
}

async fn speak_logged(engine: &dyn SpeechEngine, utterance: &Utterance, cancel: CancellationToken) {
    if let Err(e) = engine.speak(utterance, cancel).await {
        tracing::error!("Speech failed: {}", e);
    }
}

async fn join_utterance(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::error!("Utterance task panicked: {}", e);
    }
}

async fn speech_worker(
    rx: AsyncReceiver<Utterance>,
    engine: Arc<dyn SpeechEngine>,
    policy: SpeechPolicy,
    cancel: CancellationToken,
) {
    let mut current: Option<(CancellationToken, JoinHandle<()>)> = None;

    loop {
        let utterance = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(utterance) => utterance,
                Err(_) => break,
            },
        };

        match policy {
            SpeechPolicy::Queue => {
                speak_logged(engine.as_ref(), &utterance, cancel.child_token()).await;
            }
            SpeechPolicy::Replace => {
                if let Some((token, handle)) = current.take() {
                    token.cancel();
                    if handle.is_finished() {
                        join_utterance(handle).await;
                    }
                }
                let token = cancel.child_token();
                let engine = engine.clone();
                let child = token.clone();
                let handle = tokio::spawn(async move {
                    speak_logged(engine.as_ref(), &utterance, child).await;
                });
                current = Some((token, handle));
            }
        }
    }

    if let Some((token, handle)) = current {
        if cancel.is_cancelled() {
            token.cancel();
        }
        join_utterance(handle).await;
    }

    tracing::info!("Speech worker stopping");
}
