use std::path::PathBuf;

use anyhow::{Result, bail};
use image::DynamicImage;
use scanlate_types::ScanRequest;

use crate::OcrError;

/// Only the first page of a multi-page scan is processed
const SCANNED_PAGE_INDEX: usize = 0;

/// A single scanned document page
#[derive(Debug, Clone)]
pub struct ScannedPage {
    image: DynamicImage,
    quality: Option<u8>,
}

impl ScannedPage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            quality: None,
        }
    }

    pub(crate) fn with_quality(image: DynamicImage, quality: u8) -> Self {
        Self {
            image,
            quality: Some(quality),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Compression quality the pixels went through, `None` if never re-encoded
    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Where a scanned page's pixels come from
#[derive(Debug, Clone)]
pub enum PageSource {
    Path(PathBuf),
    Image(DynamicImage),
}

impl PageSource {
    fn load(self) -> Result<ScannedPage, OcrError> {
        match self {
            PageSource::Path(path) => {
                let image = image::open(&path).map_err(|source| OcrError::PageLoad {
                    path: path.clone(),
                    source,
                })?;
                Ok(ScannedPage::new(image))
            }
            PageSource::Image(image) => Ok(ScannedPage::new(image)),
        }
    }
}

/// Pages produced by one run of the scanning surface; loaded lazily
#[derive(Debug, Clone, Default)]
pub struct ScannedDocument {
    pages: Vec<PageSource>,
}

impl ScannedDocument {
    pub fn new(pages: Vec<PageSource>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn into_page(mut self, index: usize) -> Option<PageSource> {
        if index < self.pages.len() {
            Some(self.pages.swap_remove(index))
        } else {
            None
        }
    }
}

pub enum ScanOutcome {
    Finished(ScannedDocument),
    Cancelled,
}

/// The modal scanning surface
///
/// `scan` blocks until the user finishes or cancels.
pub trait Scanner: Send + Sync {
    fn scan(&self, request: &ScanRequest) -> Result<ScanOutcome>;
}

/// Scanner backed by image files on disk
///
/// Pages named in the request win over the default pages. A request that
/// ends up with no pages counts as a cancelled scan.
pub struct FileScanner {
    default_pages: Vec<PathBuf>,
}

impl FileScanner {
    pub fn new(default_pages: Vec<PathBuf>) -> Self {
        Self { default_pages }
    }
}

impl Scanner for FileScanner {
    fn scan(&self, request: &ScanRequest) -> Result<ScanOutcome> {
        let pages = if request.pages.is_empty() {
            &self.default_pages
        } else {
            &request.pages
        };

        if pages.is_empty() {
            tracing::debug!("No pages to scan");
            return Ok(ScanOutcome::Cancelled);
        }

        for page in pages {
            if !page.is_file() {
                bail!("No such page file: {}", page.display());
            }
        }

        Ok(ScanOutcome::Finished(ScannedDocument::new(
            pages.iter().cloned().map(PageSource::Path).collect(),
        )))
    }
}

/// Result of running the scanning surface once
#[derive(Debug)]
pub enum Acquisition {
    Page(ScannedPage),
    Cancelled,
}

/// Run the scanner and take the first page of the result
pub fn acquire(scanner: &dyn Scanner, request: &ScanRequest) -> Result<Acquisition, OcrError> {
    let document = match scanner.scan(request).map_err(OcrError::Scanner)? {
        ScanOutcome::Finished(document) => document,
        ScanOutcome::Cancelled => return Ok(Acquisition::Cancelled),
    };

    let page_count = document.page_count();
    let Some(source) = document.into_page(SCANNED_PAGE_INDEX) else {
        tracing::debug!("Scan finished without pages");
        return Ok(Acquisition::Cancelled);
    };

    let page = source.load()?;
    tracing::debug!(
        "Acquired page {} of {} ({}x{})",
        SCANNED_PAGE_INDEX + 1,
        page_count,
        page.width(),
        page.height()
    );

    Ok(Acquisition::Page(page))
}
