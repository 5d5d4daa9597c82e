//! OCR letter/digit confusion correction for identifier-like strings.

/// Letters commonly misread in place of digits on scanned faktur.
const CONFUSION_TABLE: [(char, char); 12] = [
    ('O', '0'),
    ('o', '0'),
    ('I', '1'),
    ('i', '1'),
    ('l', '1'),
    ('t', '1'),
    ('S', '5'),
    ('s', '5'),
    ('E', '6'),
    ('e', '6'),
    ('B', '8'),
    ('g', '9'),
];

/// Map a single character through the confusion table.
pub fn correct_char(c: char) -> char {
    CONFUSION_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Replace look-alike letters with the digits they were likely read from.
///
/// Characters outside the table (separators, other letters) pass through.
pub fn correct_identifier(s: &str) -> String {
    s.chars().map(correct_char).collect()
}

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_identifier() {
        let corrected = correct_identifier("O1l2-E456");
        assert_eq!(corrected, "0112-6456");
        assert!(corrected.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_full_table() {
        assert_eq!(correct_identifier("OoIiltSsEeBg"), "001111556689");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        assert_eq!(correct_identifier("010.000-25"), "010.000-25");
        assert_eq!(correct_identifier("XYZ"), "XYZ");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("010.000-25.12345678"), "0100002512345678");
    }
}
