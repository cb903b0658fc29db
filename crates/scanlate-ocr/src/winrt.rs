use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use windows::{
    Globalization::Language,
    Graphics::Imaging::BitmapDecoder,
    Media::Ocr::OcrEngine as WinOcrEngine,
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    core::HSTRING,
};

use crate::{ComGuard, OcrError, RecognitionOptions, TextObservation, TextRecognizer};

/// Windows.Media.Ocr reports no per-line confidence
const WINDOWS_LINE_CONFIDENCE: f32 = 1.0;

fn engine_error(context: &'static str) -> impl FnOnce(windows::core::Error) -> OcrError {
    move |e| OcrError::Engine(format!("{context}: {e}"))
}

/// Recognizer backed by the Windows built-in OCR engine
///
/// The engine has no accuracy or language-correction switches; those options
/// are ignored. Only the first configured language is used.
pub struct WindowsRecognizer {
    engine: WinOcrEngine,
}

impl WindowsRecognizer {
    /// Create an engine for a language tag such as "en-US" or "ja"
    pub fn new(language_code: &str) -> Result<Self, OcrError> {
        let tag = language_code.replace('_', "-");
        let language = Language::CreateLanguage(&HSTRING::from(tag.as_str()))
            .map_err(engine_error("Failed to create language"))?;

        let engine = WinOcrEngine::TryCreateFromLanguage(&language)
            .map_err(engine_error("Failed to create OCR engine for language"))?;

        Ok(Self { engine })
    }

    /// Language tag the engine actually recognizes
    pub fn recognizer_language(&self) -> Result<String, OcrError> {
        self.engine
            .RecognizerLanguage()
            .map_err(engine_error("Failed to get recognizer language"))?
            .LanguageTag()
            .map(|tag| tag.to_string())
            .map_err(engine_error("Failed to get language tag"))
    }
}

impl TextRecognizer for WindowsRecognizer {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        _options: &RecognitionOptions,
        sink: &mut dyn FnMut(TextObservation),
    ) -> Result<(), OcrError> {
        let _com = ComGuard::initialize()?;

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let stream =
            InMemoryRandomAccessStream::new().map_err(engine_error("Failed to create stream"))?;
        let writer = DataWriter::CreateDataWriter(&stream)
            .map_err(engine_error("Failed to create writer"))?;

        writer
            .WriteBytes(&png)
            .map_err(engine_error("Failed to write image bytes"))?;
        writer
            .StoreAsync()
            .map_err(engine_error("Failed to store async"))?
            .get()
            .map_err(engine_error("Failed to store data"))?;
        writer
            .FlushAsync()
            .map_err(engine_error("Failed to flush"))?
            .get()
            .map_err(engine_error("Failed to flush data"))?;

        stream.Seek(0).map_err(engine_error("Failed to seek"))?;

        let decoder = BitmapDecoder::CreateAsync(&stream)
            .map_err(engine_error("Failed to create decoder async"))?
            .get()
            .map_err(engine_error("Failed to get decoder"))?;

        let bitmap = decoder
            .GetSoftwareBitmapAsync()
            .map_err(engine_error("Failed to get bitmap async"))?
            .get()
            .map_err(engine_error("Failed to get software bitmap"))?;

        let result = self
            .engine
            .RecognizeAsync(&bitmap)
            .map_err(engine_error("Failed to recognize async"))?
            .get()
            .map_err(engine_error("Failed to get OCR result"))?;

        let lines = result
            .Lines()
            .map_err(engine_error("Failed to get OCR lines"))?;

        for line in &lines {
            let text = line
                .Text()
                .map_err(engine_error("Failed to get line text"))?
                .to_string();
            sink(TextObservation::single(text, WINDOWS_LINE_CONFIDENCE));
        }

        Ok(())
    }
}
