//! Faktur serial number (nomor seri faktur pajak) extraction.
//!
//! Two tiers: a tolerant scan that survives OCR letter/digit confusion, then
//! a strict digit-grouped pattern over the comma-normalized text.

use tracing::{debug, trace};

use super::identifiers::{correct_identifier, digits_only};
use super::patterns::{SERIAL_STRICT, SERIAL_TOLERANT};
use super::line_at;

/// Minimum number of digits a corrected candidate must keep.
const MIN_SERIAL_DIGITS: usize = 14;

/// Digits beyond this count are dropped.
const MAX_SERIAL_DIGITS: usize = 16;

/// Extract the faktur serial number from text.
///
/// The first tolerant candidate wins when it corrects to at least 14 digits;
/// otherwise the longest strict match is used.
pub fn extract_serial_number(text: &str) -> Option<String> {
    tolerant_serial(text).or_else(|| strict_serial(text))
}

/// Loose-shape candidates that do not sit on an NPWP/NITKU line.
fn tolerant_candidates(text: &str) -> impl Iterator<Item = &str> {
    SERIAL_TOLERANT
        .find_iter(text)
        .filter(move |m| {
            let line = line_at(text, m.start()).to_lowercase();
            let on_tax_id_line = line.contains("npwp") || line.contains("nitku");
            if on_tax_id_line {
                trace!("Discarding serial candidate {:?} on tax-id line", m.as_str());
            }
            !on_tax_id_line
        })
        .map(|m| m.as_str())
}

fn tolerant_serial(text: &str) -> Option<String> {
    let candidate = tolerant_candidates(text).next()?;
    let serial = format_serial(&correct_identifier(candidate));

    match serial {
        Some(ref serial) => debug!("Serial number {} from tolerant candidate {:?}", serial, candidate),
        None => debug!("Tolerant candidate {:?} has too few digits", candidate),
    }
    serial
}

fn strict_serial(text: &str) -> Option<String> {
    let normalized = text.replace(',', ".");

    let compact = SERIAL_STRICT
        .find_iter(&normalized)
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .reduce(|best, next| if next.len() > best.len() { next } else { best })?;

    let serial = format_serial(&compact).unwrap_or(compact);
    debug!("Serial number {} from strict pattern", serial);
    Some(serial)
}

/// Format the digits of `s` as `DDD.DDD-DD.DDDDDDDD`.
///
/// Returns `None` when fewer than 14 digits remain; digits past 16 are dropped.
pub fn format_serial(s: &str) -> Option<String> {
    let digits: String = digits_only(s).chars().take(MAX_SERIAL_DIGITS).collect();

    if digits.len() < MIN_SERIAL_DIGITS {
        return None;
    }

    Some(format!(
        "{}.{}-{}.{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..8],
        &digits[8..]
    ))
}
