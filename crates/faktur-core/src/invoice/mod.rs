//! Faktur pajak field extraction.

mod pipeline;
pub mod rules;

pub use pipeline::{ExtractionInput, ExtractionReport, FakturExtractor, Stage};

use crate::models::config::FakturConfig;
use crate::models::record::ExtractedRecord;

/// Extract a record and its confidence using the default configuration.
///
/// Total over all inputs: missing fields are left at their sentinel values
/// and lower the confidence instead of producing an error.
pub fn extract(raw_text: &str, home_entity: &str) -> (ExtractedRecord, f32) {
    FakturExtractor::new(FakturConfig::default()).extract(raw_text, home_entity)
}
