use scanlate_types::{AppEvent, FailureKind, FailureNotice, RecognizedLine};

/// Where the current capture is in its recognition lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Recognizing,
    Completed,
    Failed,
}

/// What an applied event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    RecognitionStarted,
    Recognized,
    Translated,
    ScanCancelled,
    Failure,
    /// Translate asked for with no recognized text on display
    NothingToTranslate,
    /// Backend-bound event, nothing to display
    Ignored,
}

/// Displayed state, owned by the UI task
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub recognized_text: String,
    pub recognized_lines: Vec<RecognizedLine>,
    /// `None` until the first successful translation
    pub translated_text: Option<String>,
    pub translated_to: Option<String>,
    pub phase: Phase,
    pub last_failure: Option<FailureNotice>,
    /// Operations that reached their terminal event
    pub finished: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognized text worth translating, if any
    pub fn translation_input(&self) -> Option<&str> {
        if self.recognized_text.trim().is_empty() {
            None
        } else {
            Some(&self.recognized_text)
        }
    }

    pub fn apply(&mut self, event: AppEvent) -> Update {
        match event {
            AppEvent::RecognitionStarted => {
                self.recognized_text.clear();
                self.recognized_lines.clear();
                self.phase = Phase::Recognizing;
                Update::RecognitionStarted
            }
            AppEvent::ShowRecognized { text, lines } => {
                self.recognized_text = text;
                self.recognized_lines = lines;
                if self.phase != Phase::Failed {
                    self.phase = Phase::Completed;
                }
                self.finished += 1;
                Update::Recognized
            }
            AppEvent::ShowTranslation { text, to_lang, .. } => {
                self.translated_text = Some(text);
                self.translated_to = Some(to_lang);
                self.finished += 1;
                Update::Translated
            }
            AppEvent::ScanCancelled => {
                self.finished += 1;
                Update::ScanCancelled
            }
            AppEvent::ShowFailure(notice) => {
                if notice.kind == FailureKind::RecognitionFailed {
                    self.phase = Phase::Failed;
                }
                if notice.kind.ends_operation() {
                    self.finished += 1;
                }
                self.last_failure = Some(notice);
                Update::Failure
            }
            AppEvent::Capture(_) | AppEvent::Translate { .. } => Update::Ignored,
        }
    }

    /// Close a translate request that had nothing to work on
    pub fn skip_translation(&mut self) -> Update {
        self.finished += 1;
        Update::NothingToTranslate
    }

    /// Back to `Idle` once the displayed result has been handled
    pub fn settle(&mut self) {
        if matches!(self.phase, Phase::Completed | Phase::Failed) {
            self.phase = Phase::Idle;
        }
    }
}
