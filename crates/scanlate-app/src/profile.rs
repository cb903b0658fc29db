use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use scanlate_config::Config;

/// Profile picked up from the working directory when none is given
const DEFAULT_PROFILE: &str = "scanlate.json";

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid config profile {}", path.display()))?;
    Ok(config)
}

/// Load the session config: an explicit profile, `scanlate.json` if present,
/// or defaults; `SCANLATE_*` environment variables are applied on top
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let fallback = PathBuf::from(DEFAULT_PROFILE);
    let path = match path {
        Some(path) => path,
        None if fallback.exists() => fallback.as_path(),
        None => {
            tracing::debug!("No config profile, using defaults");
            return Ok(Config::new());
        }
    };

    tracing::info!("Loading config profile {}", path.display());
    let mut config = read_profile(path)?;
    config.apply_env();
    Ok(config)
}
