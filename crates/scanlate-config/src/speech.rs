use scanlate_types::SpeechPolicy;
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_command() -> String {
    "espeak-ng".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Voice language, used regardless of the recognized text's language
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub policy: SpeechPolicy,
    /// Synthesizer executable, invoked as `<command> -v <language> --stdin`
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            language: default_language(),
            policy: SpeechPolicy::default(),
            command: default_command(),
        }
    }
}
