//! Counterparty name and NPWP (Indonesian tax ID) extraction.

use tracing::debug;

use super::identifiers::digits_only;
use super::patterns::{COMPANY_PREFIXED, COMPANY_PT, NPWP_FORMATTED, NPWP_RAW};

/// Extract the first NPWP from a counterparty block, canonically formatted.
///
/// The separator-tolerant pattern is tried before bare 15-digit runs.
pub fn extract_tax_id(block: &str) -> Option<String> {
    [&*NPWP_FORMATTED, &*NPWP_RAW]
        .into_iter()
        .flat_map(|regex| regex.find_iter(block))
        .find_map(|m| format_npwp(m.as_str()))
}

/// Format NPWP as `DD.DDD.DDD.D-DDD.DDD`.
///
/// Returns `None` when fewer than 15 digits are present.
pub fn format_npwp(npwp: &str) -> Option<String> {
    let digits = digits_only(npwp);

    if digits.len() < 15 {
        return None;
    }

    Some(format!(
        "{}.{}.{}.{}-{}.{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..9],
        &digits[9..12],
        &digits[12..15]
    ))
}

/// Extract a company name (PT/CV/UD/TOKO ...) from a counterparty block.
///
/// The block is matched upper-cased. The business-entity prefix is kept and
/// internal whitespace collapsed, e.g. `"PT MAJU JAYA"`.
pub fn extract_company_name(block: &str) -> Option<String> {
    let upper = block.to_uppercase();

    let name = [&*COMPANY_PREFIXED, &*COMPANY_PT]
        .into_iter()
        .flat_map(|regex| regex.captures_iter(&upper))
        .find_map(|caps| {
            let words = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
            (words.chars().count() > 3).then(|| format!("{} {}", &caps[1], words))
        });

    if let Some(ref name) = name {
        debug!("Counterparty name {:?}", name);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_npwp() {
        let block = "Nama : PT MAJU JAYA\nNPWP : 01.234.567.8-901.234";
        assert_eq!(extract_tax_id(block), Some("01.234.567.8-901.234".to_string()));
    }

    #[test]
    fn test_npwp_with_missing_separators_is_reformatted() {
        assert_eq!(
            extract_tax_id("NPWP: 01234.5678-901234"),
            Some("01.234.567.8-901.234".to_string())
        );
    }

    #[test]
    fn test_raw_npwp_is_reformatted() {
        assert_eq!(
            extract_tax_id("NPWP 012345678901234"),
            Some("01.234.567.8-901.234".to_string())
        );
    }

    #[test]
    fn test_no_npwp() {
        assert_eq!(extract_tax_id("Nama : PT MAJU JAYA"), None);
        assert_eq!(format_npwp("01.234.567"), None);
    }

    #[test]
    fn test_company_name_before_label() {
        let block = "Nama : PT. Maju Jaya Abadi\nAlamat : Jl. Sudirman 1";
        assert_eq!(extract_company_name(block), Some("PT MAJU JAYA ABADI".to_string()));
    }

    #[test]
    fn test_company_name_inline_label() {
        let block = "CV SINAR TERANG NPWP 01.234.567.8-901.234";
        assert_eq!(extract_company_name(block), Some("CV SINAR TERANG".to_string()));
    }

    #[test]
    fn test_bare_pt_fallback() {
        // Comma breaks the labelled pattern; the bare PT pattern still applies.
        let block = "Nama: PT Sentosa Makmur, Tbk";
        assert_eq!(extract_company_name(block), Some("PT SENTOSA MAKMUR".to_string()));
    }

    #[test]
    fn test_short_name_rejected() {
        assert_eq!(extract_company_name("PT AB\n"), None);
        assert_eq!(extract_company_name("Tidak ada nama perusahaan"), None);
    }
}
