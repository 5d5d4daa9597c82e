//! Core library for Indonesian VAT invoice (faktur pajak) extraction.
//!
//! This crate provides:
//! - Tolerant field extraction from OCR text (serial number, date, NPWP, DPP, PPN)
//! - Transaction direction classification against a configured home entity
//! - A weighted confidence score for the assembled record
//! - A recognizer seam for plugging in an external OCR or PDF text engine

pub mod error;
pub mod models;
pub mod invoice;
pub mod recognizer;

pub use error::{ConfigError, FakturError, RecognitionError, Result};
pub use models::config::{ConfidenceWeights, ExtractionConfig, FakturConfig};
pub use models::record::{Direction, ExtractedRecord};
pub use invoice::{ExtractionInput, ExtractionReport, FakturExtractor, Stage, extract};
pub use recognizer::{PlainTextRecognizer, TextRecognizer, flatten_pages};
