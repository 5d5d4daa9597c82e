//! Locale-tolerant amount parsing and formatting.
//!
//! Faktur amounts are normally Indonesian-formatted (`1.000.000,00`) but OCR
//! output and foreign templates also produce `1,000,000.00`. The separator
//! that appears last is taken as the decimal point.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a locale-ambiguous amount, returning zero when nothing parses.
pub fn normalize_amount(s: &str) -> Decimal {
    parse_amount(s).unwrap_or(Decimal::ZERO)
}

/// Parse a locale-ambiguous amount (e.g., "Rp 1.234.567,89" or "1,234,567.89").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == ',' || c == '.');

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Indonesian: 1.234.567,89
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // International: 1,234,567.89
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) => {
            let fraction = &cleaned[c + 1..];
            if fraction.len() <= 2 {
                format!("{}.{}", cleaned[..c].replace(',', ""), fraction)
            } else {
                cleaned.replace(',', "")
            }
        }
        // Dots only: several of them can only be grouping
        (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned.to_string(),
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount with international grouping (50,000,000.00).
pub fn format_amount(amount: Decimal) -> String {
    let (integer_part, decimal_part) = split_fixed(amount);
    format!("{}.{}", group_thousands(&integer_part, ','), decimal_part)
}

/// Format an amount Indonesian style (Rp 50.000.000,00).
pub fn format_rupiah(amount: Decimal) -> String {
    let (integer_part, decimal_part) = split_fixed(amount);
    format!("Rp {},{}", group_thousands(&integer_part, '.'), decimal_part)
}

fn split_fixed(amount: Decimal) -> (String, String) {
    let s = format!("{:.2}", amount.round_dp(2));
    match s.split_once('.') {
        Some((int, dec)) => (int.to_string(), dec.to_string()),
        None => (s, "00".to_string()),
    }
}

fn group_thousands(integer_part: &str, separator: char) -> String {
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::from(sign);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(separator);
        }
        formatted.push(*c);
    }

    formatted
}
