//! Common regex patterns for faktur pajak extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Serial number (nomor seri faktur): 3-3-2-8 digit groups.
    // Loose shape allowing OCR letter/digit confusion, anchored on the leading 0.
    pub static ref SERIAL_TOLERANT: Regex = Regex::new(
        r"0[0-9A-Za-z]{2}[-. \t]?[0-9A-Za-z]{3}[-. \t]?[0-9A-Za-z]{2}[-. \t]?[0-9A-Za-z]{8,}"
    ).unwrap();

    pub static ref SERIAL_STRICT: Regex = Regex::new(
        r"\d{3}[. \t]?\d{3}[-. \t]?\d{2}[. \t]?\d{8}"
    ).unwrap();

    // Dates
    pub static ref DATE_INDONESIAN_LONG: Regex = Regex::new(
        r"(?i)(\d{1,2})\s+(januari|februari|maret|april|mei|juni|juli|agustus|september|oktober|november|desember)\s+(\d{4})"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})"
    ).unwrap();

    // Party split: "Pembeli Barang Kena Pajak" / "Pembeli Kena Pajak"
    pub static ref BUYER_ANCHOR: Regex = Regex::new(
        r"(?i)Pembeli\s+(?:Barang\s+)?Kena\s+Pajak"
    ).unwrap();

    // NPWP (Indonesian tax ID): DD.DDD.DDD.D-DDD.DDD
    pub static ref NPWP_FORMATTED: Regex = Regex::new(
        r"\d{2}\.?\d{3}\.?\d{3}\.?\d-?\d{3}\.?\d{3}"
    ).unwrap();

    pub static ref NPWP_RAW: Regex = Regex::new(
        r"\d{15}"
    ).unwrap();

    // Company names, matched against upper-cased text
    pub static ref COMPANY_PREFIXED: Regex = Regex::new(
        r"\b(PT|CV|UD|TOKO)\.?\s+([A-Z\s&]+?)(?:\n|NPWP|ALAMAT|TLP)"
    ).unwrap();

    pub static ref COMPANY_PT: Regex = Regex::new(
        r"\b(PT)\.?\s+([A-Z \t&]+)"
    ).unwrap();

    // Amounts
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"\d[\d.,]*"
    ).unwrap();

    // No leading \b so that "Rp50.000.000" is seen; callers reject matches
    // that start inside a longer number.
    pub static ref GROUPED_AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:[.,]\d{3}){2,}(?:[.,]\d{1,2})?"
    ).unwrap();

    // Line-item region
    pub static ref DESCRIPTION_START: Regex = Regex::new(
        r"(?i)Nama\s+Barang\s+Kena\s+Pajak[^\n]*"
    ).unwrap();

    pub static ref DESCRIPTION_END: Regex = Regex::new(
        r"(?i)Dasar\s+Pengenaan\s+Pajak"
    ).unwrap();

    pub static ref DESCRIPTION_DISALLOWED: Regex = Regex::new(
        r"[^\w\s.,:;/()\-]"
    ).unwrap();

    // Everything but word characters and whitespace, for fuzzy name matching
    pub static ref NON_WORD: Regex = Regex::new(
        r"[^\w\s]"
    ).unwrap();
}
