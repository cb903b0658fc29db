//! OCR smoke test - run with: cargo run -p scanlate-ocr --bin test_ocr -- page.png [lang]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use scanlate_ocr::{
    Acquisition, FileScanner, RecognitionOptions, TesseractRecognizer, acquire, normalize,
    recognize_page,
};
use scanlate_types::ScanRequest;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let page = args.next().context("usage: test_ocr <page image> [language]")?;
    let language = args.next().unwrap_or_else(|| "en-US".to_string());

    println!("=== OCR Test ===");

    let scanner = FileScanner::new(vec![PathBuf::from(&page)]);
    let start = Instant::now();
    let page = match acquire(&scanner, &ScanRequest::default())? {
        Acquisition::Page(page) => page,
        Acquisition::Cancelled => {
            println!("Scan cancelled");
            return Ok(());
        }
    };
    println!("1. Loaded {}x{} in {:?}", page.width(), page.height(), start.elapsed());

    let start = Instant::now();
    let page = normalize(page);
    println!("2. Normalized (quality {:?}) in {:?}", page.quality(), start.elapsed());

    let options = RecognitionOptions {
        languages: vec![language],
        ..RecognitionOptions::default()
    };
    let start = Instant::now();
    let report = recognize_page(&TesseractRecognizer::new(None), &page, &options);
    println!("3. Recognized {} lines in {:?}", report.lines.len(), start.elapsed());

    for line in &report.lines {
        println!("   [{:.2}] {}", line.confidence, line.text);
    }
    if let Some(e) = &report.error {
        println!("   Failed: {}", e);
    }

    println!("=== Done ===");
    Ok(())
}
