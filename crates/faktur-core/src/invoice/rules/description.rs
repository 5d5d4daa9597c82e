//! Line-item description extraction.
//!
//! The goods/services table sits between the "Nama Barang Kena Pajak"
//! header and the "Dasar Pengenaan Pajak" summary row. OCR typically
//! repeats lines there and scatters single-character debris between rows.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::{DESCRIPTION_DISALLOWED, DESCRIPTION_END, DESCRIPTION_START};

/// Separator between surviving description lines.
pub const LINE_SEPARATOR: &str = " || ";

/// Known OCR misreads of faktur vocabulary.
const TYPO_CORRECTIONS: [(&str, &str); 10] = [
    ("Harqa", "Harga"),
    ("Jua1", "Jual"),
    ("Penggantlan", "Penggantian"),
    ("Termln", "Termin"),
    ("Uanq", "Uang"),
    ("Pajek", "Pajak"),
    ("Barnag", "Barang"),
    ("Potonqan", "Potongan"),
    ("Jumiah", "Jumlah"),
    ("Dlskon", "Diskon"),
];

/// Tokens that carry no content on their own (lower-cased).
const NOISE_TOKENS: [&str; 21] = [
    "-", "--", ".", "..", "...", ":", ";", ",", "/", "()", "(rp)", "rp", "i", "l", "ii", "il",
    "li", "o", "x", "no", "no.",
];

lazy_static! {
    static ref TYPO_PATTERNS: Vec<(Regex, &'static str)> = TYPO_CORRECTIONS
        .iter()
        .map(|(typo, fix)| (Regex::new(&format!(r"\b{}\b", regex::escape(typo))).unwrap(), *fix))
        .collect();
}

/// Extract the cleaned line-item region, or `None` if either anchor is
/// missing or nothing survives cleaning.
pub fn extract_description(text: &str) -> Option<String> {
    let start = DESCRIPTION_START.find(text)?;
    let rest = &text[start.end()..];
    let end = DESCRIPTION_END.find(rest)?;
    let region = &rest[..end.start()];

    let mut seen = HashSet::new();
    let cleaned: Vec<String> = region
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(clean_line)
        .filter(|line| !is_noise(line))
        .collect();

    if cleaned.is_empty() {
        debug!("Description region present but empty after cleaning");
        return None;
    }

    debug!("Description has {} lines", cleaned.len());
    Some(cleaned.join(LINE_SEPARATOR))
}

fn clean_line(line: &str) -> String {
    let stripped = DESCRIPTION_DISALLOWED.replace_all(line, "");
    let mut fixed = stripped.into_owned();
    for (pattern, replacement) in TYPO_PATTERNS.iter() {
        if pattern.is_match(&fixed) {
            fixed = pattern.replace_all(&fixed, *replacement).into_owned();
        }
    }
    fixed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_noise(line: &str) -> bool {
    line.split_whitespace()
        .all(|token| NOISE_TOKENS.contains(&token.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKTUR_TABLE: &str = "\
No. Nama Barang Kena Pajak / Jasa Kena Pajak Harga Jual/Penggantian (Rp)
1 Jasa konsultasi pajak Rp 25.000.000,00
1 Jasa konsultasi pajak Rp 25.000.000,00
| ~
2 Sewa perangkat * lunak Rp 25.000.000,00
i l
Harqa Jua1 / Penggantlan 50.000.000,00
Dasar Pengenaan Pajak 50.000.000,00";

    #[test]
    fn test_extract_description() {
        let description = extract_description(FAKTUR_TABLE).unwrap();
        assert_eq!(
            description,
            "1 Jasa konsultasi pajak Rp 25.000.000,00 || \
             2 Sewa perangkat lunak Rp 25.000.000,00 || \
             Harga Jual / Penggantian 50.000.000,00"
        );
    }

    #[test]
    fn test_missing_end_anchor() {
        let text = "Nama Barang Kena Pajak\nJasa konsultasi";
        assert_eq!(extract_description(text), None);
    }

    #[test]
    fn test_missing_start_anchor() {
        let text = "Jasa konsultasi\nDasar Pengenaan Pajak 10.000";
        assert_eq!(extract_description(text), None);
    }

    #[test]
    fn test_only_noise() {
        let text = "Nama Barang Kena Pajak\n-\n:\nI\n\nDasar Pengenaan Pajak";
        assert_eq!(extract_description(text), None);
    }

    #[test]
    fn test_end_anchor_before_start_is_ignored() {
        let text = "Dasar Pengenaan Pajak\nNAMA BARANG KENA PAJAK\nSemen 50 sak\ndasar pengenaan pajak";
        assert_eq!(extract_description(text), Some("Semen 50 sak".to_string()));
    }
}
