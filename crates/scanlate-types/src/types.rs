use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events exchanged between the UI task and the app task
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Open the scanning surface and process the first page
    Capture(ScanRequest),
    /// Translate the currently displayed recognized text
    Translate { text: String },
    /// Recognition is about to run, displayed text must be reset
    RecognitionStarted,
    ShowRecognized {
        text: String,
        lines: Vec<RecognizedLine>,
    },
    ShowTranslation {
        text: String,
        from_lang: Option<String>,
        to_lang: String,
    },
    ScanCancelled,
    ShowFailure(FailureNotice),
}

/// User actions fed into the UI task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Scan the given page files; empty means "use the default pages"
    Capture(Vec<PathBuf>),
    Translate,
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    pub pages: Vec<PathBuf>,
}

impl ScanRequest {
    pub fn new(pages: Vec<PathBuf>) -> Self {
        Self { pages }
    }
}

/// One line of recognized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
    /// Recognizer certainty in [0.0, 1.0]
    pub confidence: f32,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
        }
    }
}

/// Recognition accuracy mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionLevel {
    Fast,
    #[default]
    Accurate,
}

/// What happens when an utterance arrives while another is still playing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechPolicy {
    /// Play utterances one after another
    Queue,
    /// Stop the current utterance and play the new one
    #[default]
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    AcquisitionFailed,
    AcquisitionCancelled,
    RecognitionFailed,
    TranslationFailed,
}

impl FailureKind {
    /// Whether a failure of this kind is the last event of its operation.
    ///
    /// A recognition failure is always followed by a (possibly partial)
    /// `ShowRecognized`, so it does not end the capture.
    pub fn ends_operation(self) -> bool {
        !matches!(self, FailureKind::RecognitionFailed)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::AcquisitionFailed => "scan failed",
            FailureKind::AcquisitionCancelled => "scan cancelled",
            FailureKind::RecognitionFailed => "text recognition failed",
            FailureKind::TranslationFailed => "translation failed",
        };
        f.write_str(label)
    }
}

/// A failure surfaced to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureNotice {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureNotice {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(RecognizedLine::new("a", 1.7).confidence, 1.0);
        assert_eq!(RecognizedLine::new("a", -0.2).confidence, 0.0);
        assert_eq!(RecognizedLine::new("a", f32::NAN).confidence, 0.0);
        assert_eq!(RecognizedLine::new("a", 0.8).confidence, 0.8);
    }

    #[test]
    fn test_only_recognition_failure_keeps_operation_open() {
        assert!(FailureKind::AcquisitionFailed.ends_operation());
        assert!(FailureKind::AcquisitionCancelled.ends_operation());
        assert!(FailureKind::TranslationFailed.ends_operation());
        assert!(!FailureKind::RecognitionFailed.ends_operation());
    }

    #[test]
    fn test_failure_notice_display() {
        let notice = FailureNotice::new(FailureKind::TranslationFailed, "HTTP 500");
        assert_eq!(notice.to_string(), "translation failed: HTTP 500");
    }
}
