mod announcer;
mod engine;

pub use announcer::Announcer;
pub use engine::{CommandSpeechEngine, SilentSpeechEngine, SpeechEngine};

/// A unit of synthesized speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// Voice language, e.g. "en-US"
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Synthesizer exited with {0}")]
    Exit(std::process::ExitStatus),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
