//! Rule-based field extractors for faktur pajak text.

pub mod amounts;
pub mod confidence;
pub mod counterparty;
pub mod dates;
pub mod description;
pub mod identifiers;
pub mod numbers;
pub mod patterns;
pub mod role;
pub mod serial;

pub use amounts::{compute_tax, extract_taxable_base, resolve_tax, AmountSource, TaxableBase};
pub use confidence::{score, FieldScores};
pub use counterparty::{extract_company_name, extract_tax_id, format_npwp};
pub use dates::extract_transaction_date;
pub use description::extract_description;
pub use identifiers::{correct_identifier, digits_only};
pub use numbers::{format_amount, format_rupiah, normalize_amount, parse_amount};
pub use role::{similarity_ratio, RoleAssignment, RoleClassifier};
pub use serial::{extract_serial_number, format_serial};

/// The full line of `text` containing byte offset `pos`.
pub(crate) fn line_at(text: &str, pos: usize) -> &str {
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_at() {
        let text = "first\nNPWP: 01.234\nlast";
        let pos = text.find("01.234").unwrap();
        assert_eq!(line_at(text, pos), "NPWP: 01.234");
        assert_eq!(line_at(text, 0), "first");
        assert_eq!(line_at(text, text.len()), "last");
    }
}
