//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use faktur_core::models::config::FakturConfig;
use faktur_core::{ExtractionReport, FakturExtractor, PlainTextRecognizer, TextRecognizer};

use crate::pdf::PdfTextRecognizer;

/// File extensions the CLI knows how to recognize.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("faktur")
        .join("config.json")
}

/// Config path from `--config`, or the default location.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration for an extraction command.
///
/// An explicit `--config` file must exist; a missing default file means
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FakturConfig> {
    let path = resolve_config_path(config_path);

    let config = if path.exists() {
        debug!("Loading configuration from {}", path.display());
        FakturConfig::from_file(&path)?
    } else if config_path.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    } else {
        FakturConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Lower-cased extension of `path`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Recognizer for a file, chosen by extension.
pub fn recognizer_for(path: &Path) -> anyhow::Result<Box<dyn TextRecognizer>> {
    match extension_of(path).as_str() {
        "txt" => Ok(Box::new(PlainTextRecognizer::new())),
        "pdf" => Ok(Box::new(PdfTextRecognizer::new())),
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}

/// Recognize and extract one file.
pub fn extract_file(
    path: &Path,
    extractor: &FakturExtractor,
    home_entity: &str,
) -> anyhow::Result<ExtractionReport> {
    let recognizer = recognizer_for(path)?;
    let data = fs::read(path)?;

    debug!("Recognizing {} with {}", path.display(), recognizer.name());
    let report = extractor.process_document(recognizer.as_ref(), &data, home_entity)?;
    Ok(report)
}
