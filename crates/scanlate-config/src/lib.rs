use std::env;

use scanlate_types::SpeechPolicy;
use serde::{Deserialize, Serialize};

use self::ocr::OcrConfig;
use self::speech::SpeechConfig;
use self::translator::TranslatorConfig;

pub mod ocr;
pub mod speech;
pub mod translator;

/// Process-wide settings, fixed for the whole session
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override fields from `SCANLATE_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(lang) = var("SCANLATE_TARGET_LANG") {
            self.translator.to_lang = lang;
        }

        if let Some(key) = var("SCANLATE_TRANSLATOR_API_KEY") {
            self.translator.api_key = key;
        }

        if let Some(provider) = var("SCANLATE_TRANSLATOR_PROVIDER") {
            self.translator.provider = provider.to_lowercase();
        }

        if let Some(timeout) = var("SCANLATE_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.translator.timeout_seconds = timeout;
        }

        if let Some(languages) = var("SCANLATE_OCR_LANGUAGE") {
            let languages: Vec<String> = languages
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
            if !languages.is_empty() {
                self.ocr.languages = languages;
            }
        }

        match var("SCANLATE_SPEECH_POLICY").map(|v| v.to_lowercase()).as_deref() {
            Some("queue") => self.speech.policy = SpeechPolicy::Queue,
            Some("replace") => self.speech.policy = SpeechPolicy::Replace,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use scanlate_types::RecognitionLevel;

    use super::*;

    #[test]
    fn test_defaults_match_capture_app() {
        let config = Config::default();
        assert_eq!(config.ocr.languages, vec!["en-US".to_string()]);
        assert_eq!(config.ocr.accuracy, RecognitionLevel::Accurate);
        assert!(config.ocr.language_correction);
        assert_eq!(config.translator.to_lang, "ja");
        assert_eq!(config.translator.from_lang, None);
        assert_eq!(config.speech.language, "en-US");
        assert_eq!(config.speech.policy, SpeechPolicy::Replace);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "translator": { "provider": "deepl", "api_key": "k" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.translator.provider, "deepl");
        assert_eq!(config.translator.api_key, "k");
        assert_eq!(config.translator.to_lang, "ja");
        assert_eq!(config.translator.timeout_seconds, 30);
        assert_eq!(config.speech.command, "espeak-ng");
    }

    #[test]
    fn test_enums_use_lowercase_names() {
        let json = r#"{ "ocr": { "accuracy": "fast", "engine": "tesseract" },
                        "speech": { "policy": "queue" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ocr.accuracy, RecognitionLevel::Fast);
        assert_eq!(config.ocr.engine, ocr::OcrEngineKind::Tesseract);
        assert_eq!(config.speech.policy, SpeechPolicy::Queue);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCANLATE_TARGET_LANG", "de"),
            ("SCANLATE_TRANSLATOR_PROVIDER", "DeepL"),
            ("SCANLATE_TIMEOUT_SECONDS", "not a number"),
            ("SCANLATE_OCR_LANGUAGE", "ja, en-US,"),
            ("SCANLATE_SPEECH_POLICY", "queue"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.translator.to_lang, "de");
        assert_eq!(config.translator.provider, "deepl");
        assert_eq!(config.translator.timeout_seconds, 30);
        assert_eq!(config.ocr.languages, vec!["ja".to_string(), "en-US".to_string()]);
        assert_eq!(config.speech.policy, SpeechPolicy::Queue);
    }

    #[test]
    fn test_speech_policy_override_ignores_case() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "SCANLATE_SPEECH_POLICY").then(|| "Queue".to_string()));
        assert_eq!(config.speech.policy, SpeechPolicy::Queue);

        config.apply_overrides(|key| (key == "SCANLATE_SPEECH_POLICY").then(|| "REPLACE".to_string()));
        assert_eq!(config.speech.policy, SpeechPolicy::Replace);
    }
}
