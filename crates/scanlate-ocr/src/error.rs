use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Scanner failed: {0:#}")]
    Scanner(anyhow::Error),

    #[error("Failed to load page {path}: {source}")]
    PageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR engine '{0}' is not available on this platform")]
    UnsupportedEngine(String),
}
