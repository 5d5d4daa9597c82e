//! DPP (taxable base) extraction and PPN computation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::line_at;
use super::numbers::normalize_amount;
use super::patterns::{GROUPED_AMOUNT, NUMBER_TOKEN};

/// Standard PPN rate (11%).
pub const STANDARD_VAT_RATE: Decimal = Decimal::from_parts(11, 0, 0, false, 2);

/// Where the taxable base came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    /// Last number on the "Dasar Pengenaan Pajak" line.
    Anchored,
    /// Largest grouped number above the materiality floor.
    LargestCandidate,
    /// Nothing usable was found.
    NotFound,
}

/// Extracted taxable base.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxableBase {
    pub value: Decimal,
    pub source: AmountSource,
}

/// Extract the DPP from faktur text.
///
/// Uses the anchored "Dasar Pengenaan Pajak" line when it yields a positive
/// amount, otherwise the largest grouped number strictly above
/// `materiality_floor`, otherwise zero.
pub fn extract_taxable_base(text: &str, materiality_floor: Decimal) -> TaxableBase {
    if let Some(value) = anchored_base(text) {
        return TaxableBase {
            value,
            source: AmountSource::Anchored,
        };
    }

    let fallback = GROUPED_AMOUNT
        .find_iter(text)
        .filter(|m| is_amount_candidate(text, m.start(), m.end()))
        .map(|m| normalize_amount(m.as_str()))
        .filter(|amount| *amount > materiality_floor)
        .max();

    match fallback {
        Some(value) => {
            debug!("DPP fallback to largest candidate {}", value);
            TaxableBase {
                value,
                source: AmountSource::LargestCandidate,
            }
        }
        None => TaxableBase {
            value: Decimal::ZERO,
            source: AmountSource::NotFound,
        },
    }
}

/// Whether the grouped number at `text[start..end]` can be a money amount.
///
/// Rejects fragments of longer numbers and of NPWP/NITKU identifiers, whose
/// leading `DD.DDD.DDD.D` part has the same shape as an amount.
fn is_amount_candidate(text: &str, start: usize, end: usize) -> bool {
    let inside_number = text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ',');
    let before_dash = text[end..].starts_with('-');
    if inside_number || before_dash {
        return false;
    }

    let line = line_at(text, start).to_lowercase();
    let on_tax_id_line = line.contains("npwp") || line.contains("nitku");
    if on_tax_id_line {
        trace!("Ignoring amount candidate {:?} on tax-id line", &text[start..end]);
    }
    !on_tax_id_line
}

fn anchored_base(text: &str) -> Option<Decimal> {
    let line = text
        .lines()
        .find(|line| line.to_lowercase().contains("dasar pengenaan pajak"))?;

    let last_number = NUMBER_TOKEN.find_iter(line).last()?;
    let value = normalize_amount(last_number.as_str());

    if value > Decimal::ZERO {
        debug!("DPP {} from line {:?}", value, line.trim());
        Some(value)
    } else {
        None
    }
}

/// PPN at the standard rate, rounded half away from zero to 2 decimals.
pub fn compute_tax(base: Decimal) -> Decimal {
    (base * STANDARD_VAT_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// PPN for a base, honouring an explicit override verbatim.
pub fn resolve_tax(base: Decimal, tax_override: Option<Decimal>) -> Decimal {
    match tax_override {
        Some(tax) => tax,
        None if base.is_zero() => Decimal::ZERO,
        None => compute_tax(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn floor() -> Decimal {
        Decimal::new(10_000_000, 0)
    }

    #[test]
    fn test_anchored_base() {
        let text = "Harga Jual 55.000.000,00\nDasar Pengenaan Pajak Rp 50.000.000,00\nPPN 5.500.000,00";
        let base = extract_taxable_base(text, floor());

        assert_eq!(base.value, dec("50000000.00"));
        assert_eq!(base.source, AmountSource::Anchored);
        assert_eq!(resolve_tax(base.value, None), dec("5500000.00"));
    }

    #[test]
    fn test_anchor_is_case_insensitive() {
        let text = "DASAR PENGENAAN PAJAK : 1,250,000.50";
        assert_eq!(extract_taxable_base(text, floor()).value, dec("1250000.50"));
    }

    #[test]
    fn test_fallback_to_largest_candidate() {
        let text = "Item 1.500\nSubtotal 12.000.000,00\nTotal 45.250.000,00\nLain 9.999.999,00";
        let base = extract_taxable_base(text, floor());

        assert_eq!(base.value, dec("45250000.00"));
        assert_eq!(base.source, AmountSource::LargestCandidate);
    }

    #[test]
    fn test_anchor_without_number_falls_back() {
        let text = "Dasar Pengenaan Pajak\n20.000.000,00";
        let base = extract_taxable_base(text, floor());

        assert_eq!(base.value, dec("20000000.00"));
        assert_eq!(base.source, AmountSource::LargestCandidate);
    }

    #[test]
    fn test_fallback_ignores_npwp() {
        let text = "NPWP : 09.876.543.2-101.000\n\
                    Dasar Pengenaan Pajak (tidak terbaca)\n\
                    Total 25.000.000,00";
        let base = extract_taxable_base(text, floor());

        assert_eq!(base.value, dec("25000000.00"));
        assert_eq!(base.source, AmountSource::LargestCandidate);
        assert_eq!(resolve_tax(base.value, None), dec("2750000.00"));
    }

    #[test]
    fn test_fallback_ignores_unlabelled_npwp() {
        // Same shape without the label; the trailing dash gives it away.
        let text = "PT MAJU JAYA 01.234.567.8-901.234\nTotal 15.000.000,00";
        assert_eq!(extract_taxable_base(text, floor()).value, dec("15000000.00"));
    }

    #[test]
    fn test_fallback_sees_amount_glued_to_currency() {
        let text = "FAKTUR\nJumlah Rp50.000.000,00\nTotal Rp 30.000.000,00";
        assert_eq!(extract_taxable_base(text, floor()).value, dec("50000000.00"));
    }

    #[test]
    fn test_fallback_skips_tail_of_longer_number() {
        let text = "Ref 9876.543.210\nTotal 12.000.000,00";
        assert_eq!(extract_taxable_base(text, floor()).value, dec("12000000.00"));
    }

    #[test]
    fn test_nothing_above_floor() {
        let base = extract_taxable_base("Total 9.000.000,00", floor());
        assert_eq!(base.value, Decimal::ZERO);
        assert_eq!(base.source, AmountSource::NotFound);
    }

    #[test]
    fn test_compute_tax_rounding() {
        assert_eq!(compute_tax(dec("100")), dec("11.00"));
        assert_eq!(compute_tax(dec("0.05")), dec("0.01"));
        assert_eq!(compute_tax(dec("12345.67")), dec("1358.02"));
    }

    #[test]
    fn test_override_is_verbatim() {
        assert_eq!(resolve_tax(dec("1000"), Some(dec("123.456"))), dec("123.456"));
        assert_eq!(resolve_tax(Decimal::ZERO, None), Decimal::ZERO);
    }
}
