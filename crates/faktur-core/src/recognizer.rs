//! Text recognition seam.
//!
//! Turning a scanned or digital document into text is left to an injected
//! [`TextRecognizer`]. Extraction only ever sees the flattened text.

use tracing::debug;

use crate::error::RecognitionError;

/// Page separator used by plain-text dumps of multi-page documents.
const FORM_FEED: char = '\u{0c}';

/// Trait for document text recognizers (OCR engines, PDF text layers, ...).
pub trait TextRecognizer {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &str;

    /// Recognize the text of each page of `document`, in page order.
    fn recognize_pages(&self, document: &[u8]) -> Result<Vec<String>, RecognitionError>;
}

/// Join recognized pages into one text, skipping blank pages.
pub fn flatten_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Recognizer for documents that already are UTF-8 text.
///
/// Pages are separated by form feeds, as written by `pdftotext` and most
/// OCR command-line tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRecognizer;

impl PlainTextRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl TextRecognizer for PlainTextRecognizer {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn recognize_pages(&self, document: &[u8]) -> Result<Vec<String>, RecognitionError> {
        let text = std::str::from_utf8(document)
            .map_err(|e| RecognitionError::Unreadable(format!("not UTF-8 text: {}", e)))?;

        let pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        debug!("Plain text document with {} pages", pages.len());
        Ok(pages)
    }
}
