use scanlate_types::RecognitionLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// Tesseract through libtesseract
    Tesseract,
    /// Windows.Media.Ocr, only available on Windows
    Windows,
}

fn default_engine() -> OcrEngineKind {
    if cfg!(windows) {
        OcrEngineKind::Windows
    } else {
        OcrEngineKind::Tesseract
    }
}

fn default_languages() -> Vec<String> {
    vec!["en-US".to_string()]
}

fn default_language_correction() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    #[serde(default = "default_engine")]
    pub engine: OcrEngineKind,
    /// Recognition languages, BCP-47 style ("en-US", "ja")
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub accuracy: RecognitionLevel,
    #[serde(default = "default_language_correction")]
    pub language_correction: bool,
    /// Directory holding `*.traineddata`, `None` for the libtesseract default
    #[serde(default)]
    pub tessdata: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            languages: default_languages(),
            accuracy: RecognitionLevel::default(),
            language_correction: default_language_correction(),
            tessdata: None,
        }
    }
}
