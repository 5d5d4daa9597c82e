//! Extraction pipeline sequencing the field rules into one record.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{RecognitionError, Result};
use crate::models::config::FakturConfig;
use crate::models::record::{
    reporting_period, Direction, ExtractedRecord, DESCRIPTION_NOT_FOUND, PLACEHOLDER_TAX_ID,
    UNKNOWN_COUNTERPARTY,
};
use crate::recognizer::{flatten_pages, TextRecognizer};

use super::rules::{
    extract_company_name, extract_description, extract_serial_number, extract_tax_id,
    extract_taxable_base, extract_transaction_date, resolve_tax, AmountSource, FieldScores,
    RoleClassifier,
};

/// Pipeline stages, visited strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    IdentifyInvoice,
    ClassifyRole,
    ExtractCounterparty,
    ExtractAmounts,
    ExtractDescription,
    Score,
    Done,
}

/// One extraction request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionInput {
    /// Recognized document text.
    pub raw_text: String,
    /// Display name of the home entity.
    pub home_entity: String,
    /// PPN amount supplied by the caller, used verbatim when present.
    pub tax_override: Option<Decimal>,
}

impl ExtractionInput {
    pub fn new(raw_text: impl Into<String>, home_entity: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            home_entity: home_entity.into(),
            tax_override: None,
        }
    }

    pub fn with_tax_override(mut self, tax: Decimal) -> Self {
        self.tax_override = Some(tax);
        self
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Assembled record.
    pub record: ExtractedRecord,
    /// Overall confidence (0.0 - 1.0), same as `record.confidence`.
    pub confidence: f32,
    /// Per-field score breakdown.
    pub field_scores: FieldScores,
    /// Fallbacks taken during extraction.
    pub warnings: Vec<String>,
    /// Fields left at their sentinel value.
    pub missing_fields: Vec<String>,
    /// Stages visited, always ending with [`Stage::Done`].
    pub stages: Vec<Stage>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based faktur extractor.
#[derive(Debug, Clone)]
pub struct FakturExtractor {
    config: FakturConfig,
    classifier: RoleClassifier,
}

impl FakturExtractor {
    /// Create an extractor from configuration.
    pub fn new(config: FakturConfig) -> Self {
        let classifier = RoleClassifier::new().with_thresholds(
            config.extraction.anchored_match_threshold,
            config.extraction.fallback_match_threshold,
        );
        Self { config, classifier }
    }

    pub fn config(&self) -> &FakturConfig {
        &self.config
    }

    /// Extract a record and its confidence from recognized text.
    pub fn extract(&self, raw_text: &str, home_entity: &str) -> (ExtractedRecord, f32) {
        self.extract_input(&ExtractionInput::new(raw_text, home_entity))
    }

    /// Extract a record and its confidence, honouring a tax override.
    pub fn extract_input(&self, input: &ExtractionInput) -> (ExtractedRecord, f32) {
        let report = self.run(input);
        (report.record, report.confidence)
    }

    /// Run every stage and report how each field was resolved.
    ///
    /// Never fails: a stage that finds nothing leaves its field at the
    /// documented sentinel and the run continues.
    pub fn run(&self, input: &ExtractionInput) -> ExtractionReport {
        let start = Instant::now();
        let text = input.raw_text.as_str();
        let mut stages = vec![Stage::Start];
        let mut warnings = Vec::new();
        let mut missing_fields = Vec::new();
        let mut record = ExtractedRecord::empty();

        info!("Extracting faktur from {} characters of text", text.len());

        stages.push(Stage::IdentifyInvoice);
        record.invoice_number = extract_serial_number(text);
        record.transaction_date = extract_transaction_date(text);
        record.reporting_period = record.transaction_date.map(reporting_period);
        if record.invoice_number.is_none() {
            debug!("No serial number found");
            missing_fields.push("invoice_number".to_string());
        }
        if record.transaction_date.is_none() {
            debug!("No transaction date found");
            missing_fields.push("transaction_date".to_string());
        }

        stages.push(Stage::ClassifyRole);
        let roles = self.classifier.classify(text, &input.home_entity);
        record.direction = roles.direction;
        if !roles.anchor_found {
            warnings.push("Buyer anchor not found; classified by whole-text scan".to_string());
        }
        if roles.direction == Direction::Unknown {
            warn!("Home entity {:?} not found in faktur", input.home_entity);
            warnings.push(format!(
                "Home entity {:?} not found in either party block",
                input.home_entity
            ));
        }

        stages.push(Stage::ExtractCounterparty);
        if let Some(block) = roles.counterparty_block {
            if let Some(name) = extract_company_name(block) {
                record.counterparty_name = name;
            }
            if let Some(tax_id) = extract_tax_id(block) {
                record.counterparty_tax_id = tax_id;
            }
        }
        if record.counterparty_name == UNKNOWN_COUNTERPARTY {
            debug!("Counterparty name falls back to {:?}", UNKNOWN_COUNTERPARTY);
            missing_fields.push("counterparty_name".to_string());
        }
        if record.counterparty_tax_id == PLACEHOLDER_TAX_ID {
            debug!("Counterparty NPWP falls back to placeholder");
            missing_fields.push("counterparty_tax_id".to_string());
        }

        stages.push(Stage::ExtractAmounts);
        let base = extract_taxable_base(text, self.config.extraction.materiality_floor);
        record.taxable_base = base.value;
        record.tax_amount = resolve_tax(base.value, input.tax_override);
        record.tax_overridden = input.tax_override.is_some();
        match base.source {
            AmountSource::Anchored => {}
            AmountSource::LargestCandidate => {
                warnings.push("DPP line not found; using largest amount in document".to_string());
            }
            AmountSource::NotFound => {
                debug!("No taxable base found");
                missing_fields.push("taxable_base".to_string());
            }
        }

        stages.push(Stage::ExtractDescription);
        match extract_description(text) {
            Some(description) => record.description = description,
            None => {
                debug!("Description falls back to {:?}", DESCRIPTION_NOT_FOUND);
                missing_fields.push("description".to_string());
            }
        }

        stages.push(Stage::Score);
        let field_scores = FieldScores::of(&record, &self.config.weights);
        let confidence = field_scores.total();
        record.confidence = confidence;

        stages.push(Stage::Done);
        info!(
            "Extracted faktur {} ({}) with confidence {:.2}",
            record.invoice_number.as_deref().unwrap_or("-"),
            record.direction.as_str(),
            confidence
        );

        ExtractionReport {
            record,
            confidence,
            field_scores,
            warnings,
            missing_fields,
            stages,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Recognize a document, flatten its pages and extract from the text.
    pub fn process_document(
        &self,
        recognizer: &dyn TextRecognizer,
        document: &[u8],
        home_entity: &str,
    ) -> Result<ExtractionReport> {
        let pages = recognizer.recognize_pages(document)?;
        let text = flatten_pages(&pages);

        if text.trim().is_empty() {
            return Err(RecognitionError::NoText.into());
        }

        debug!(
            "{} produced {} characters from {} pages",
            recognizer.name(),
            text.len(),
            pages.len()
        );

        Ok(self.run(&ExtractionInput::new(text, home_entity)))
    }
}

impl Default for FakturExtractor {
    fn default() -> Self {
        Self::new(FakturConfig::default())
    }
}
