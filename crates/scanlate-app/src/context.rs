use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use scanlate_config::Config;
use scanlate_config::ocr::{OcrConfig, OcrEngineKind};
use scanlate_config::translator::TranslatorConfig;
use scanlate_ocr::{FileScanner, OcrError, RecognitionOptions, Scanner, TextRecognizer};
use scanlate_translator::{DeepLTranslator, GoogleTranslator, TranslateError, Translator};
use scanlate_types::AppEvent;

/// External capabilities the pipeline is wired to
#[derive(Clone)]
pub struct Services {
    pub scanner: Arc<dyn Scanner>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub translator: Option<Arc<dyn Translator>>,
}

impl Services {
    pub fn from_config(config: &Config, default_pages: Vec<PathBuf>) -> anyhow::Result<Self> {
        let recognizer = build_recognizer(&config.ocr).context("Failed to set up OCR engine")?;
        let translator =
            build_translator(&config.translator).context("Failed to set up translator")?;

        Ok(Self {
            scanner: Arc::new(FileScanner::new(default_pages)),
            recognizer,
            translator,
        })
    }
}

fn build_recognizer(config: &OcrConfig) -> Result<Arc<dyn TextRecognizer>, OcrError> {
    match config.engine {
        OcrEngineKind::Tesseract => Ok(Arc::new(scanlate_ocr::TesseractRecognizer::new(
            config.tessdata.clone(),
        ))),
        #[cfg(windows)]
        OcrEngineKind::Windows => {
            let language = config.languages.first().map_or("en-US", String::as_str);
            let recognizer = scanlate_ocr::WindowsRecognizer::new(language)?;
            tracing::info!(
                "Windows OCR recognizing {}",
                recognizer.recognizer_language()?
            );
            Ok(Arc::new(recognizer))
        }
        #[cfg(not(windows))]
        OcrEngineKind::Windows => Err(OcrError::UnsupportedEngine("windows".to_string())),
    }
}

fn build_translator(
    config: &TranslatorConfig,
) -> Result<Option<Arc<dyn Translator>>, TranslateError> {
    if !config.enabled {
        tracing::info!("Translation disabled");
        return Ok(None);
    }

    if config.api_key.is_empty() {
        tracing::warn!("No translator API key configured, translation unavailable");
        return Ok(None);
    }

    let timeout = config.timeout();
    let translator: Arc<dyn Translator> = match config.provider.as_str() {
        "google" => Arc::new(GoogleTranslator::new(
            config.api_key.clone(),
            config.api_url.clone(),
            timeout,
        )?),
        "deepl" => Arc::new(DeepLTranslator::new(
            config.api_key.clone(),
            config.api_url.clone(),
            timeout,
        )?),
        other => return Err(TranslateError::UnknownProvider(other.to_string())),
    };

    tracing::info!("Translating with {}", translator.metadata().name);
    Ok(Some(translator))
}

/// Everything the app-side handlers need, passed explicitly to each stage
#[derive(Clone)]
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub services: Services,
    pub event_tx: AsyncSender<AppEvent>,
}

impl PipelineContext {
    pub fn new(config: Arc<Config>, services: Services, event_tx: AsyncSender<AppEvent>) -> Self {
        Self {
            config,
            services,
            event_tx,
        }
    }

    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions {
            languages: self.config.ocr.languages.clone(),
            level: self.config.ocr.accuracy,
            language_correction: self.config.ocr.language_correction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_needs_api_key() {
        let config = TranslatorConfig::default();
        assert!(build_translator(&config).unwrap().is_none());
    }

    #[test]
    fn test_disabled_translator() {
        let config = TranslatorConfig {
            enabled: false,
            api_key: "key".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(build_translator(&config).unwrap().is_none());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = TranslatorConfig {
            provider: "babelfish".to_string(),
            api_key: "key".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(matches!(
            build_translator(&config),
            Err(TranslateError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_known_providers_are_built() {
        for provider in ["google", "deepl"] {
            let config = TranslatorConfig {
                provider: provider.to_string(),
                api_key: "key".to_string(),
                ..TranslatorConfig::default()
            };
            assert!(build_translator(&config).unwrap().is_some());
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_windows_engine_unavailable_elsewhere() {
        let config = OcrConfig {
            engine: OcrEngineKind::Windows,
            ..OcrConfig::default()
        };
        assert!(matches!(
            build_recognizer(&config),
            Err(OcrError::UnsupportedEngine(_))
        ));
    }

    #[test]
    fn test_recognition_options_follow_config() {
        let mut config = Config::default();
        config.ocr.languages = vec!["ja".to_string()];
        config.ocr.language_correction = false;
        let (tx, _rx) = kanal::unbounded_async();
        let services = Services {
            scanner: Arc::new(FileScanner::new(vec![])),
            recognizer: build_recognizer(&OcrConfig {
                engine: OcrEngineKind::Tesseract,
                ..OcrConfig::default()
            })
            .unwrap(),
            translator: None,
        };

        let ctx = PipelineContext::new(Arc::new(config), services, tx);
        let options = ctx.recognition_options();

        assert_eq!(options.languages, vec!["ja".to_string()]);
        assert!(!options.language_correction);
    }
}
