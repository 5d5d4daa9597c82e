//! PDF text-layer recognizer using lopdf.
//!
//! Only the embedded text layer is read. Scanned PDFs without one yield
//! blank pages and are rejected by the extractor as having no text.

use lopdf::Document;
use tracing::{debug, warn};

use faktur_core::{RecognitionError, TextRecognizer};

/// Recognizer reading the embedded text of each PDF page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextRecognizer;

impl PdfTextRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl TextRecognizer for PdfTextRecognizer {
    fn name(&self) -> &str {
        "pdf-text"
    }

    fn recognize_pages(&self, document: &[u8]) -> Result<Vec<String>, RecognitionError> {
        let mut doc =
            Document::load_mem(document).map_err(|e| RecognitionError::Unreadable(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            doc.decrypt("")
                .map_err(|_| RecognitionError::Unreadable("PDF is password protected".to_string()))?;
            debug!("Decrypted PDF with empty password");
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(RecognitionError::Unreadable("PDF has no pages".to_string()));
        }

        debug!("Loaded PDF with {} pages", page_numbers.len());

        let pages = page_numbers
            .iter()
            .map(|&number| {
                doc.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                })
            })
            .collect();

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn single_page_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_reads_text_layer() {
        let pdf = single_page_pdf("Dasar Pengenaan Pajak 50.000.000,00");
        let pages = PdfTextRecognizer::new().recognize_pages(&pdf).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Dasar Pengenaan Pajak"));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let result = PdfTextRecognizer::new().recognize_pages(b"not a pdf");
        assert!(matches!(result, Err(RecognitionError::Unreadable(_))));
    }
}
