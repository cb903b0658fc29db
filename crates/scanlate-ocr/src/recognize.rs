use image::DynamicImage;
use scanlate_types::{RecognitionLevel, RecognizedLine};

use crate::{OcrError, ScannedPage};

/// One ranked reading of a detected text region
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub confidence: f32,
}

/// A detected text region with its candidate readings
#[derive(Debug, Clone, Default)]
pub struct TextObservation {
    pub candidates: Vec<Candidate>,
}

impl TextObservation {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Region with a single reading
    pub fn single(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            candidates: vec![Candidate {
                text: text.into(),
                confidence,
            }],
        }
    }

    /// Highest-confidence candidate; ties go to the engine's earlier ranking
    pub fn top_candidate(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.confidence > best.confidence { c } else { best })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub languages: Vec<String>,
    pub level: RecognitionLevel,
    pub language_correction: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            languages: vec!["en-US".to_string()],
            level: RecognitionLevel::Accurate,
            language_correction: true,
        }
    }
}

/// OCR engine interface
pub trait TextRecognizer: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Recognize text, pushing regions into `sink` in reading order.
    ///
    /// Blocking. Regions already pushed stay valid when an error is returned.
    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
        sink: &mut dyn FnMut(TextObservation),
    ) -> Result<(), OcrError>;
}

/// Lines recognized on one page, and the engine error if it stopped early
#[derive(Debug)]
pub struct RecognitionReport {
    pub lines: Vec<RecognizedLine>,
    pub error: Option<OcrError>,
}

impl RecognitionReport {
    pub fn text(&self) -> String {
        join_lines(&self.lines)
    }
}

/// Run `recognizer` on a page, keeping the top candidate of every region
pub fn recognize_page(
    recognizer: &dyn TextRecognizer,
    page: &ScannedPage,
    options: &RecognitionOptions,
) -> RecognitionReport {
    let mut lines = Vec::new();

    let mut sink = |observation: TextObservation| match observation.top_candidate() {
        Some(top) => {
            tracing::debug!("Line '{}' confidence {:.2}", top.text, top.confidence);
            lines.push(RecognizedLine::new(top.text.clone(), top.confidence));
        }
        None => tracing::debug!("Skipping region without candidates"),
    };

    let result = recognizer.recognize(page.image(), options, &mut sink);

    let error = match result {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(
                "[{}] recognition failed after {} lines: {}",
                recognizer.name(),
                lines.len(),
                e
            );
            Some(e)
        }
    };

    RecognitionReport { lines, error }
}

/// Concatenate lines in order, each followed by a line break
pub fn join_lines(lines: &[RecognizedLine]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.text.len() + 1).sum());
    for line in lines {
        text.push_str(&line.text);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;

    struct ScriptedRecognizer {
        observations: Vec<TextObservation>,
        fail_after: Option<usize>,
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn recognize(
            &self,
            _image: &DynamicImage,
            _options: &RecognitionOptions,
            sink: &mut dyn FnMut(TextObservation),
        ) -> Result<(), OcrError> {
            for (i, observation) in self.observations.iter().enumerate() {
                if self.fail_after == Some(i) {
                    return Err(OcrError::Engine("engine crashed".to_string()));
                }
                sink(observation.clone());
            }
            Ok(())
        }
    }

    fn blank_page() -> ScannedPage {
        ScannedPage::new(DynamicImage::ImageRgb8(RgbImage::new(4, 4)))
    }

    #[test]
    fn test_hello_world_blob() {
        let recognizer = ScriptedRecognizer {
            observations: vec![
                TextObservation::single("HELLO", 0.95),
                TextObservation::single("WORLD", 0.80),
            ],
            fail_after: None,
        };

        let report = recognize_page(&recognizer, &blank_page(), &RecognitionOptions::default());

        assert!(report.error.is_none());
        assert_eq!(report.text(), "HELLO\nWORLD\n");
        assert_eq!(report.lines[0].confidence, 0.95);
        assert_eq!(report.lines[1].confidence, 0.80);
    }

    #[test]
    fn test_only_top_candidate_is_kept() {
        let recognizer = ScriptedRecognizer {
            observations: vec![TextObservation::new(vec![
                Candidate { text: "HELL0".into(), confidence: 0.4 },
                Candidate { text: "HELLO".into(), confidence: 0.9 },
                Candidate { text: "HELIO".into(), confidence: 0.9 },
            ])],
            fail_after: None,
        };

        let report = recognize_page(&recognizer, &blank_page(), &RecognitionOptions::default());

        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].text, "HELLO");
    }

    #[test]
    fn test_regions_without_candidates_are_skipped() {
        let recognizer = ScriptedRecognizer {
            observations: vec![
                TextObservation::single("first", 0.7),
                TextObservation::default(),
                TextObservation::single("third", 0.6),
            ],
            fail_after: None,
        };

        let report = recognize_page(&recognizer, &blank_page(), &RecognitionOptions::default());

        assert_eq!(report.text(), "first\nthird\n");
    }

    #[test]
    fn test_failure_keeps_partial_lines() {
        let recognizer = ScriptedRecognizer {
            observations: vec![
                TextObservation::single("kept", 0.9),
                TextObservation::single("lost", 0.9),
            ],
            fail_after: Some(1),
        };

        let report = recognize_page(&recognizer, &blank_page(), &RecognitionOptions::default());

        assert!(matches!(report.error, Some(OcrError::Engine(_))));
        assert_eq!(report.text(), "kept\n");
    }

    #[test]
    fn test_no_regions_gives_empty_text() {
        let recognizer = ScriptedRecognizer {
            observations: vec![],
            fail_after: None,
        };

        let report = recognize_page(&recognizer, &blank_page(), &RecognitionOptions::default());

        assert!(report.lines.is_empty());
        assert_eq!(report.text(), "");
    }

    #[test]
    fn test_join_lines_terminates_every_line() {
        let lines = vec![
            RecognizedLine::new("a", 1.0),
            RecognizedLine::new("", 1.0),
            RecognizedLine::new("c", 1.0),
        ];
        assert_eq!(join_lines(&lines), "a\n\nc\n");
    }
}
