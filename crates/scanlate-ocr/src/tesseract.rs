use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use leptess::{LepTess, Variable};
use scanlate_types::RecognitionLevel;

use crate::{OcrError, RecognitionOptions, TextObservation, TextRecognizer};

/// TSV row level of a single word
const WORD_LEVEL: &str = "5";

/// `tessedit_ocr_engine_mode` value selecting the LSTM engine only
const LSTM_ONLY: &str = "1";

/// Recognizer backed by libtesseract through `leptess`
///
/// A fresh engine is initialized per page with the requested languages, and
/// its TSV output is read back as one observation per text line.
pub struct TesseractRecognizer {
    tessdata: Option<String>,
}

/// Engine parameters derived from the recognition options
#[derive(Debug, PartialEq)]
struct EngineSettings {
    languages: String,
    ocr_engine_mode: Option<&'static str>,
    dictionaries: bool,
}

impl EngineSettings {
    fn from_options(options: &RecognitionOptions) -> Self {
        let languages = if options.languages.is_empty() {
            "eng".to_string()
        } else {
            options
                .languages
                .iter()
                .map(|l| tesseract_language(l))
                .collect::<Vec<_>>()
                .join("+")
        };

        Self {
            languages,
            ocr_engine_mode: (options.level == RecognitionLevel::Accurate).then_some(LSTM_ONLY),
            dictionaries: options.language_correction,
        }
    }
}

impl TesseractRecognizer {
    /// `tessdata` is the directory holding `*.traineddata`, `None` for the
    /// libtesseract default
    pub fn new(tessdata: Option<String>) -> Self {
        Self { tessdata }
    }

    fn engine(&self, settings: &EngineSettings) -> Result<LepTess, OcrError> {
        let mut engine = LepTess::new(self.tessdata.as_deref(), &settings.languages).map_err(
            |e| OcrError::Engine(format!("failed to load '{}': {}", settings.languages, e)),
        )?;

        if let Some(mode) = settings.ocr_engine_mode {
            set_variable(&mut engine, Variable::TesseditOcrEngineMode, mode)?;
        }

        if !settings.dictionaries {
            set_variable(&mut engine, Variable::LoadSystemDawg, "0")?;
            set_variable(&mut engine, Variable::LoadFreqDawg, "0")?;
        }

        Ok(engine)
    }
}

fn set_variable(engine: &mut LepTess, name: Variable, value: &str) -> Result<(), OcrError> {
    engine
        .set_variable(name, value)
        .map_err(|e| OcrError::Engine(format!("failed to set tesseract variable: {}", e)))
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
        sink: &mut dyn FnMut(TextObservation),
    ) -> Result<(), OcrError> {
        let settings = EngineSettings::from_options(options);
        tracing::debug!("tesseract settings {:?}", settings);

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut engine = self.engine(&settings)?;
        engine
            .set_image_from_mem(&png)
            .map_err(|e| OcrError::Engine(format!("tesseract rejected the page: {}", e)))?;

        let tsv = engine
            .get_tsv_text(0)
            .map_err(|e| OcrError::Engine(format!("unreadable tesseract output: {}", e)))?;

        let emitted = parse_tsv(&tsv, sink);
        tracing::debug!("tesseract produced {} lines", emitted);

        Ok(())
    }
}

/// Map a BCP-47 or underscore language code to a tesseract traineddata name
///
/// Unknown codes pass through so tesseract names ("chi_tra") still work.
pub fn tesseract_language(code: &str) -> String {
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_lowercase();

    let mapped = match primary.as_str() {
        "en" => "eng",
        "ja" => "jpn",
        "zh" => "chi_sim",
        "ko" => "kor",
        "de" => "deu",
        "fr" => "fra",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "ru" => "rus",
        _ => return code.to_string(),
    };

    mapped.to_string()
}

#[derive(Debug, PartialEq)]
struct LineKey<'a> {
    page: &'a str,
    block: &'a str,
    paragraph: &'a str,
    line: &'a str,
}

#[derive(Default)]
struct LineAccumulator {
    words: Vec<String>,
    confidence_sum: f32,
}

impl LineAccumulator {
    fn flush(&mut self, sink: &mut dyn FnMut(TextObservation)) -> bool {
        if self.words.is_empty() {
            return false;
        }
        let confidence = self.confidence_sum / self.words.len() as f32 / 100.0;
        sink(TextObservation::single(self.words.join(" "), confidence));
        self.words.clear();
        self.confidence_sum = 0.0;
        true
    }
}

/// Group word rows of tesseract TSV output into lines, returns lines emitted
///
/// Header and non-word rows are skipped by their level column.
fn parse_tsv(tsv: &str, sink: &mut dyn FnMut(TextObservation)) -> usize {
    let mut emitted = 0;
    let mut current_key: Option<LineKey> = None;
    let mut line = LineAccumulator::default();

    for row in tsv.lines() {
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < 12 || columns[0] != WORD_LEVEL {
            continue;
        }

        let text = columns[11].trim();
        let Ok(confidence) = columns[10].parse::<f32>() else {
            continue;
        };
        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        let key = LineKey {
            page: columns[1],
            block: columns[2],
            paragraph: columns[3],
            line: columns[4],
        };

        if current_key.as_ref() != Some(&key) {
            if line.flush(sink) {
                emitted += 1;
            }
            current_key = Some(key);
        }

        line.words.push(text.to_string());
        line.confidence_sum += confidence;
    }

    if line.flush(sink) {
        emitted += 1;
    }

    emitted
}
