//! Seller/buyer split and transaction direction classification.
//!
//! A faktur lists the seller (Pengusaha Kena Pajak) first and the buyer
//! after the "Pembeli Barang Kena Pajak" heading. Whichever block contains
//! the home entity decides the direction; the other block belongs to the
//! counterparty.

use tracing::debug;

use crate::models::record::Direction;

use super::patterns::{BUYER_ANCHOR, NON_WORD};

/// Seller/buyer classification for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAssignment<'t> {
    /// Inbound, outbound or unknown.
    pub direction: Direction,
    /// Text before the buyer anchor (empty in degraded mode).
    pub seller_block: &'t str,
    /// Text after the buyer anchor (whole text in degraded mode).
    pub buyer_block: &'t str,
    /// Block belonging to the counterparty, absent when direction is unknown.
    pub counterparty_block: Option<&'t str>,
    /// Line that matched the home entity.
    pub matched_line: Option<&'t str>,
    /// Whether the buyer anchor was present.
    pub anchor_found: bool,
}

impl RoleAssignment<'_> {
    fn unknown(anchor_found: bool) -> Self {
        Self {
            direction: Direction::Unknown,
            seller_block: "",
            buyer_block: "",
            counterparty_block: None,
            matched_line: None,
            anchor_found,
        }
    }
}

/// Fuzzy-matching role classifier.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    /// Threshold when the buyer anchor splits the document.
    anchored_threshold: u8,
    /// Threshold for the whole-text scan when the anchor is missing.
    fallback_threshold: u8,
}

impl RoleClassifier {
    /// Create a classifier with the default thresholds (70 anchored, 80 fallback).
    pub fn new() -> Self {
        Self {
            anchored_threshold: 70,
            fallback_threshold: 80,
        }
    }

    /// Set both similarity thresholds (0-100).
    pub fn with_thresholds(mut self, anchored: u8, fallback: u8) -> Self {
        self.anchored_threshold = anchored;
        self.fallback_threshold = fallback;
        self
    }

    /// Classify `text` relative to `home_entity`.
    pub fn classify<'t>(&self, text: &'t str, home_entity: &str) -> RoleAssignment<'t> {
        let home = clean_for_match(home_entity);

        let Some(anchor) = BUYER_ANCHOR.find(text) else {
            debug!("Buyer anchor not found, scanning whole text for home entity");
            return match find_matching_line(text, &home, self.fallback_threshold) {
                Some(line) => {
                    debug!("Home entity matched {:?} without anchor, assuming inbound", line);
                    RoleAssignment {
                        direction: Direction::Inbound,
                        seller_block: "",
                        buyer_block: text,
                        counterparty_block: Some(""),
                        matched_line: Some(line),
                        anchor_found: false,
                    }
                }
                None => RoleAssignment::unknown(false),
            };
        };

        let seller_block = &text[..anchor.start()];
        let buyer_block = &text[anchor.end()..];

        if let Some(line) = find_matching_line(buyer_block, &home, self.anchored_threshold) {
            debug!("Home entity matched buyer line {:?}", line);
            return RoleAssignment {
                direction: Direction::Inbound,
                seller_block,
                buyer_block,
                counterparty_block: Some(seller_block),
                matched_line: Some(line),
                anchor_found: true,
            };
        }

        if let Some(line) = find_matching_line(seller_block, &home, self.anchored_threshold) {
            debug!("Home entity matched seller line {:?}", line);
            return RoleAssignment {
                direction: Direction::Outbound,
                seller_block,
                buyer_block,
                counterparty_block: Some(buyer_block),
                matched_line: Some(line),
                anchor_found: true,
            };
        }

        debug!("Home entity not found in either party block");
        RoleAssignment {
            seller_block,
            buyer_block,
            ..RoleAssignment::unknown(true)
        }
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn find_matching_line<'t>(block: &'t str, home: &str, threshold: u8) -> Option<&'t str> {
    block
        .lines()
        .find(|line| similarity_ratio(&clean_for_match(line), home) >= threshold)
}

/// Strip punctuation, trim and upper-case a name for comparison.
pub fn clean_for_match(s: &str) -> String {
    NON_WORD.replace_all(s, "").trim().to_uppercase()
}

/// Similarity of two strings on a 0-100 scale.
///
/// `200 * lcs / (len(a) + len(b))`, i.e. the normalized indel similarity.
/// Empty input on either side scores 0.
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let lcs = longest_common_subsequence(&a, &b);
    let ratio = 200.0 * lcs as f64 / (a.len() + b.len()) as f64;
    ratio.round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELLER_HEADER: &str = "Pengusaha Kena Pajak\nNama : PT SUMBER REJEKI\nNPWP : 01.234.567.8-901.000\n";

    #[test]
    fn test_similarity_ratio() {
        assert_eq!(similarity_ratio("PT UTAMA", "PT UTAMA"), 100);
        assert_eq!(similarity_ratio("ABCD", "WXYZ"), 0);
        assert_eq!(similarity_ratio("", "PT UTAMA"), 0);
        // lcs("PT UTAMA", "PT UTAMI") = 7 -> 200 * 7 / 16
        assert_eq!(similarity_ratio("PT UTAMA", "PT UTAMI"), 88);
    }

    #[test]
    fn test_clean_for_match() {
        assert_eq!(clean_for_match("  Pt. Utama, Tbk "), "PT UTAMA TBK");
    }

    #[test]
    fn test_inbound_when_home_is_buyer() {
        let text = format!("{SELLER_HEADER}Pembeli Kena Pajak\nPT UTAMA\nNPWP : 02.000.000.0-000.000");
        let roles = RoleClassifier::new().classify(&text, "PT Utama");

        assert_eq!(roles.direction, Direction::Inbound);
        assert_eq!(roles.counterparty_block, Some(roles.seller_block));
        assert!(roles.seller_block.contains("SUMBER REJEKI"));
        assert_eq!(roles.matched_line, Some("PT UTAMA"));
    }

    #[test]
    fn test_outbound_when_home_is_seller() {
        let text = "Pengusaha Kena Pajak\nPT UTAMA\nPembeli Barang Kena Pajak\nNama : CV MAJU JAYA";
        let roles = RoleClassifier::new().classify(text, "PT UTAMA");

        assert_eq!(roles.direction, Direction::Outbound);
        assert_eq!(roles.counterparty_block, Some("\nNama : CV MAJU JAYA"));
    }

    #[test]
    fn test_unknown_when_no_block_matches() {
        let text = format!("{SELLER_HEADER}Pembeli Kena Pajak\nCV LAIN SEKALI");
        let roles = RoleClassifier::new().classify(&text, "PT UTAMA");

        assert_eq!(roles.direction, Direction::Unknown);
        assert_eq!(roles.counterparty_block, None);
        assert!(roles.anchor_found);
    }

    #[test]
    fn test_degraded_mode_without_anchor() {
        let text = "FAKTUR PAJAK\nPT UTAMA\nJl. Merdeka 1";
        let roles = RoleClassifier::new().classify(text, "PT UTAMA");

        assert_eq!(roles.direction, Direction::Inbound);
        assert_eq!(roles.seller_block, "");
        assert_eq!(roles.buyer_block, text);
        assert_eq!(roles.counterparty_block, Some(""));
        assert!(!roles.anchor_found);
    }

    #[test]
    fn test_degraded_mode_uses_stricter_threshold() {
        // "NAMA  PT UTAMA" vs "PT UTAMA" scores 73: enough anchored, not enough without anchor.
        let line = "Nama : PT UTAMA";
        assert_eq!(similarity_ratio(&clean_for_match(line), "PT UTAMA"), 73);

        let roles = RoleClassifier::new().classify(line, "PT UTAMA");
        assert_eq!(roles.direction, Direction::Unknown);

        let anchored = format!("Penjual\nPembeli Kena Pajak\n{line}");
        let roles = RoleClassifier::new().classify(&anchored, "PT UTAMA");
        assert_eq!(roles.direction, Direction::Inbound);
    }
}
