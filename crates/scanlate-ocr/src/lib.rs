mod error;
mod normalize;
mod recognize;
mod scan;
mod tesseract;

#[cfg(windows)]
mod com;
#[cfg(windows)]
mod winrt;

pub use error::OcrError;
pub use normalize::{MAX_JPEG_QUALITY, normalize};
pub use recognize::{
    Candidate, RecognitionOptions, RecognitionReport, TextObservation, TextRecognizer, join_lines,
    recognize_page,
};
pub use scan::{
    Acquisition, FileScanner, PageSource, ScanOutcome, ScannedDocument, ScannedPage, Scanner,
    acquire,
};
pub use tesseract::{TesseractRecognizer, tesseract_language};

#[cfg(windows)]
pub use com::ComGuard;
#[cfg(windows)]
pub use winrt::WindowsRecognizer;
