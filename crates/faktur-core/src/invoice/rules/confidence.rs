//! Weighted confidence scoring for an assembled record.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::config::ConfidenceWeights;
use crate::models::record::ExtractedRecord;

/// Invoice numbers shorter than this earn no credit.
const MIN_INVOICE_NUMBER_LEN: usize = 10;

/// Per-field contribution to the confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldScores {
    pub invoice_number: f32,
    pub transaction_date: f32,
    pub counterparty_name: f32,
    pub counterparty_tax_id: f32,
    pub taxable_base: f32,
    pub description: f32,
}

impl FieldScores {
    /// Score each field of `record`. Every field earns its full weight or nothing.
    pub fn of(record: &ExtractedRecord, weights: &ConfidenceWeights) -> Self {
        let credit = |resolved: bool, weight: f32| if resolved { weight } else { 0.0 };

        let invoice_number_ok = record
            .invoice_number
            .as_deref()
            .is_some_and(|n| n.chars().count() >= MIN_INVOICE_NUMBER_LEN);

        Self {
            invoice_number: credit(invoice_number_ok, weights.invoice_number),
            transaction_date: credit(record.transaction_date.is_some(), weights.transaction_date),
            counterparty_name: credit(record.has_counterparty_name(), weights.counterparty_name),
            counterparty_tax_id: credit(
                record.has_counterparty_tax_id(),
                weights.counterparty_tax_id,
            ),
            taxable_base: credit(record.taxable_base > Decimal::ZERO, weights.taxable_base),
            description: credit(record.has_description(), weights.description),
        }
    }

    /// Sum of all contributions, capped at 1.0.
    pub fn total(&self) -> f32 {
        let sum = self.invoice_number
            + self.transaction_date
            + self.counterparty_name
            + self.counterparty_tax_id
            + self.taxable_base
            + self.description;
        sum.clamp(0.0, 1.0)
    }
}

/// Confidence of `record` in [0, 1].
pub fn score(record: &ExtractedRecord, weights: &ConfidenceWeights) -> f32 {
    FieldScores::of(record, weights).total()
}
