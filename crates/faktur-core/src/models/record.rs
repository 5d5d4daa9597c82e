//! The structured record produced from one faktur pajak.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::amounts::compute_tax;
use crate::invoice::rules::dates::indonesian_month_name;

/// Placeholder used when no counterparty name could be resolved.
pub const UNKNOWN_COUNTERPARTY: &str = "Tidak diketahui";

/// Placeholder used when no counterparty NPWP could be resolved.
pub const PLACEHOLDER_TAX_ID: &str = "00.000.000.0-000.000";

/// Placeholder used when the line-item region is missing or empty.
pub const DESCRIPTION_NOT_FOUND: &str = "Tidak ditemukan";

/// Transaction direction relative to the home entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The home entity is the buyer (PPN masukan, input tax).
    Inbound,
    /// The home entity is the seller (PPN keluaran, output tax).
    Outbound,
    /// The home entity was found in neither party block.
    #[default]
    Unknown,
}

impl Direction {
    /// Tax ledger a record with this direction is booked into.
    pub fn ledger(&self) -> Option<&'static str> {
        match self {
            Direction::Inbound => Some("PPN_MASUKAN"),
            Direction::Outbound => Some("PPN_KELUARAN"),
            Direction::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
            Direction::Unknown => "unknown",
        }
    }
}

/// Fields extracted from a single faktur pajak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Serial number, `DDD.DDD-DD.DDDDDDDD` when recovered by the tolerant pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Transaction date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,

    /// Reporting period derived from the date, e.g. "Maret 2025".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<String>,

    /// Inbound/outbound classification.
    pub direction: Direction,

    /// Counterparty company name, or [`UNKNOWN_COUNTERPARTY`].
    pub counterparty_name: String,

    /// Counterparty NPWP `DD.DDD.DDD.D-DDD.DDD`, or [`PLACEHOLDER_TAX_ID`].
    pub counterparty_tax_id: String,

    /// Dasar Pengenaan Pajak (taxable base).
    pub taxable_base: Decimal,

    /// PPN amount.
    pub tax_amount: Decimal,

    /// Whether `tax_amount` came from a caller-supplied override.
    #[serde(default)]
    pub tax_overridden: bool,

    /// Line-item summary joined with `" || "`, or [`DESCRIPTION_NOT_FOUND`].
    pub description: String,

    /// Extraction confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl ExtractedRecord {
    /// A record with every field at its sentinel or default.
    pub fn empty() -> Self {
        Self {
            invoice_number: None,
            transaction_date: None,
            reporting_period: None,
            direction: Direction::Unknown,
            counterparty_name: UNKNOWN_COUNTERPARTY.to_string(),
            counterparty_tax_id: PLACEHOLDER_TAX_ID.to_string(),
            taxable_base: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            tax_overridden: false,
            description: DESCRIPTION_NOT_FOUND.to_string(),
            confidence: 0.0,
        }
    }

    pub fn has_counterparty_name(&self) -> bool {
        !self.counterparty_name.is_empty() && self.counterparty_name != UNKNOWN_COUNTERPARTY
    }

    pub fn has_counterparty_tax_id(&self) -> bool {
        !self.counterparty_tax_id.is_empty() && self.counterparty_tax_id != PLACEHOLDER_TAX_ID
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty() && self.description != DESCRIPTION_NOT_FOUND
    }

    /// Tax ledger the record belongs to, if the direction is known.
    pub fn ledger(&self) -> Option<&'static str> {
        self.direction.ledger()
    }

    /// Validate the record and return any consistency issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.transaction_date.is_none() {
            issues.push("Missing transaction date".to_string());
        }

        if self.direction == Direction::Unknown {
            issues.push("Home entity not found in either party block".to_string());
        }

        if !self.has_counterparty_tax_id() {
            issues.push("Counterparty NPWP not resolved".to_string());
        }

        if self.taxable_base.is_zero() {
            issues.push("Taxable base is zero".to_string());
        }

        if !self.tax_overridden {
            let expected = compute_tax(self.taxable_base);
            if self.tax_amount != expected {
                issues.push(format!(
                    "Tax amount ({}) differs from 11% of base ({})",
                    self.tax_amount, expected
                ));
            }
        }

        issues
    }
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// Indonesian reporting period label for a date ("Januari 2025").
pub fn reporting_period(date: NaiveDate) -> String {
    format!("{} {}", indonesian_month_name(date.month()), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_empty_record_uses_sentinels() {
        let record = ExtractedRecord::empty();
        assert!(!record.has_counterparty_name());
        assert!(!record.has_counterparty_tax_id());
        assert!(!record.has_description());
        assert_eq!(record.ledger(), None);
    }

    #[test]
    fn test_direction_ledger() {
        assert_eq!(Direction::Inbound.ledger(), Some("PPN_MASUKAN"));
        assert_eq!(Direction::Outbound.ledger(), Some("PPN_KELUARAN"));
        assert_eq!(Direction::Unknown.ledger(), None);
    }

    #[test]
    fn test_reporting_period() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(reporting_period(date), "Maret 2025");
    }

    #[test]
    fn test_validate_flags_inconsistent_tax() {
        let mut record = ExtractedRecord::empty();
        record.taxable_base = Decimal::from_str("1000.00").unwrap();
        record.tax_amount = Decimal::from_str("100.00").unwrap();

        let issues = record.validate();
        assert!(issues.iter().any(|i| i.starts_with("Tax amount")));

        record.tax_overridden = true;
        let issues = record.validate();
        assert!(!issues.iter().any(|i| i.starts_with("Tax amount")));
    }

    #[test]
    fn test_serialized_direction() {
        let json = serde_json::to_string(&Direction::Outbound).unwrap();
        assert_eq!(json, "\"outbound\"");
    }
}
