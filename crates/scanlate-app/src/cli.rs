use std::path::PathBuf;

use clap::Parser;

/// Scan a document page, read it aloud and translate it
#[derive(Parser, Debug)]
#[command(name = "scanlate")]
#[command(about = "Scan a page, recognize its text, speak it and translate it")]
pub struct Args {
    /// JSON config profile (defaults to ./scanlate.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page image offered by the scanner when `scan` is given no paths
    #[arg(short, long = "page")]
    pub pages: Vec<PathBuf>,

    /// Scan once, translate, then exit
    #[arg(long)]
    pub once: bool,

    /// Target language code for translation
    #[arg(short, long)]
    pub target: Option<String>,

    /// Do not read recognized text aloud
    #[arg(long)]
    pub no_speech: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
