use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{SpeechError, Utterance};

/// Speech synthesizer interface
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Speak until the utterance finishes or `cancel` fires
    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken)
    -> Result<(), SpeechError>;
}

/// Speaks through an external synthesizer such as `espeak-ng`
///
/// Invoked as `<program> -v <voice> --stdin` with the text on stdin.
pub struct CommandSpeechEngine {
    program: String,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn voice(language: &str) -> String {
        language.replace('_', "-").to_lowercase()
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn speak(
        &self,
        utterance: &Utterance,
        cancel: CancellationToken,
    ) -> Result<(), SpeechError> {
        let mut child = Command::new(&self.program)
            .arg("-v")
            .arg(Self::voice(&utterance.language))
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let speaking = async {
            if let Some(mut stdin) = stdin {
                stdin.write_all(utterance.text.as_bytes()).await?;
                // Closing stdin ends the text
                drop(stdin);
            }
            child.wait().await
        };

        // `None` when cancelled, even mid-write
        let finished = tokio::select! {
            status = speaking => Some(status),
            _ = cancel.cancelled() => None,
        };

        let Some(status) = finished else {
            tracing::debug!("Utterance cancelled, stopping {}", self.program);
            child.kill().await?;
            return Ok(());
        };
        let status = status?;

        if !status.success() {
            return Err(SpeechError::Exit(status));
        }

        Ok(())
    }
}

/// Engine that only logs, for machines without a synthesizer
pub struct SilentSpeechEngine;

#[async_trait]
impl SpeechEngine for SilentSpeechEngine {
    fn name(&self) -> &'static str {
        "silent"
    }

    async fn speak(
        &self,
        utterance: &Utterance,
        _cancel: CancellationToken,
    ) -> Result<(), SpeechError> {
        tracing::info!(
            "(silent) would speak {} chars in {}",
            utterance.text.chars().count(),
            utterance.language
        );
        Ok(())
    }
}
