use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_to_lang() -> String {
    "ja".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// "google" or "deepl"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Source language, `None` lets the service detect it
    #[serde(default)]
    pub from_lang: Option<String>,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's endpoint
    #[serde(default)]
    pub api_url: Option<String>,
    /// Per-request timeout, 0 means the default
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            from_lang: None,
            to_lang: default_to_lang(),
            api_key: String::new(),
            api_url: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        match self.timeout_seconds {
            0 => Duration::from_secs(default_timeout_seconds()),
            seconds => Duration::from_secs(seconds),
        }
    }
}
