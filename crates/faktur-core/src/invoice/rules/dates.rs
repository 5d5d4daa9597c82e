//! Transaction date extraction for faktur pajak.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::{DATE_DMY, DATE_INDONESIAN_LONG, DATE_YMD};

const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

type DateTier = fn(&str) -> Vec<NaiveDate>;

/// Date tiers in priority order. A later tier is only consulted when every
/// earlier tier produced no valid calendar date.
const DATE_TIERS: [(&str, DateTier); 3] = [
    ("indonesian-long", indonesian_long_dates),
    ("dd-mm-yyyy", dmy_dates),
    ("yyyy-mm-dd", ymd_dates),
];

/// Extract the transaction date from faktur text.
pub fn extract_transaction_date(text: &str) -> Option<NaiveDate> {
    DATE_TIERS.iter().find_map(|(name, tier)| {
        let mut dates = tier(text);
        // Long-form dates near the signature block (end of the document)
        // are more reliable than header boilerplate.
        let picked = if *name == "indonesian-long" {
            dates.pop()
        } else {
            dates.into_iter().next()
        };

        if let Some(date) = picked {
            debug!("Transaction date {} from {} tier", date, name);
        }
        picked
    })
}

/// "15 Maret 2025"
fn indonesian_long_dates(text: &str) -> Vec<NaiveDate> {
    DATE_INDONESIAN_LONG
        .captures_iter(text)
        .filter_map(|caps| {
            let day: u32 = caps[1].parse().ok()?;
            let month = month_number(&caps[2])?;
            let year: i32 = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .collect()
}

/// DD-MM-YYYY or DD/MM/YYYY
fn dmy_dates(text: &str) -> Vec<NaiveDate> {
    DATE_DMY
        .captures_iter(text)
        .filter_map(|caps| {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .collect()
}

/// YYYY-MM-DD or YYYY/MM/DD
fn ymd_dates(text: &str) -> Vec<NaiveDate> {
    DATE_YMD
        .captures_iter(text)
        .filter_map(|caps| {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .collect()
}

/// Month number (1-12) for an Indonesian month name, case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    INDONESIAN_MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Indonesian month name for a month number (1-12).
pub fn indonesian_month_name(month: u32) -> &'static str {
    INDONESIAN_MONTHS
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}
