//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FakturError};

/// Main configuration for the faktur pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakturConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Per-field confidence weights.
    pub weights: ConfidenceWeights,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Display name of the home entity used for direction classification.
    pub home_entity: String,

    /// Similarity (0-100) a line must reach when the buyer anchor is present.
    pub anchored_match_threshold: u8,

    /// Similarity (0-100) a line must reach when the buyer anchor is missing.
    pub fallback_match_threshold: u8,

    /// Fallback DPP candidates must exceed this amount.
    pub materiality_floor: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            home_entity: "PT UTAMA".to_string(),
            anchored_match_threshold: 70,
            fallback_match_threshold: 80,
            materiality_floor: Decimal::new(10_000_000, 0),
        }
    }
}

/// Weight added to the confidence score for each resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Invoice number present and at least 10 characters.
    pub invoice_number: f32,
    /// Transaction date parsed.
    pub transaction_date: f32,
    /// Counterparty name resolved.
    pub counterparty_name: f32,
    /// Counterparty NPWP resolved.
    pub counterparty_tax_id: f32,
    /// Taxable base above zero.
    pub taxable_base: f32,
    /// Line-item description found.
    pub description: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            invoice_number: 0.25,
            transaction_date: 0.15,
            counterparty_name: 0.20,
            counterparty_tax_id: 0.15,
            taxable_base: 0.20,
            description: 0.05,
        }
    }
}

impl ConfidenceWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f32 {
        self.invoice_number
            + self.transaction_date
            + self.counterparty_name
            + self.counterparty_tax_id
            + self.taxable_base
            + self.description
    }
}

impl FakturConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, FakturError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), FakturError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that thresholds and weights are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.home_entity.trim().is_empty() {
            return Err(ConfigError::EmptyHomeEntity);
        }

        for (name, value) in [
            ("anchored_match_threshold", self.extraction.anchored_match_threshold),
            ("fallback_match_threshold", self.extraction.fallback_match_threshold),
        ] {
            if value > 100 {
                return Err(ConfigError::Threshold {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-4 {
            return Err(ConfigError::WeightSum(total));
        }

        Ok(())
    }

    /// Replace the home entity name.
    pub fn with_home_entity(mut self, name: impl Into<String>) -> Self {
        self.extraction.home_entity = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ConfidenceWeights::default().total() - 1.0).abs() < 1e-6);
        assert!(FakturConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let mut config = FakturConfig::default();
        config.weights.description = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_validate_rejects_blank_home_entity() {
        let config = FakturConfig::default().with_home_entity("  ");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyHomeEntity)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "extraction": { "home_entity": "PT SUMBER MAKMUR" } }"#;
        let config: FakturConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.extraction.home_entity, "PT SUMBER MAKMUR");
        assert_eq!(config.extraction.anchored_match_threshold, 70);
        assert_eq!(config.extraction.fallback_match_threshold, 80);
        assert_eq!(config.weights, ConfidenceWeights::default());
    }
}
