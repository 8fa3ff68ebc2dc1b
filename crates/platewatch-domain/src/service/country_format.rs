//! Per-country plate character rules

use platewatch_types::{Country, PlateAlphabet};

use crate::service::candidate_generator::alphanumeric_skeleton;

/// Character extraction, validity and formatting for a country's plates
pub trait CountryFormat {
    /// Keep only the characters that can appear on the country's plates
    fn extract_relevant_characters(&self, text: &str, country: Country) -> String;

    /// Whether the text is a well-formed plate for the country
    fn is_valid_format(&self, text: &str, country: Country) -> bool;

    /// Canonical display form, if the text is a valid plate
    fn format_if_valid(&self, text: &str, country: Country) -> Option<String>;

    /// Built-in `L`/`N`/literal patterns, most common first
    fn canonical_template_patterns(&self, country: Country) -> Vec<String>;

    /// Formatted readings of text with one character too many, dropping either end
    fn overread_alternatives(&self, text: &str, country: Country) -> Vec<String>;
}

/// Built-in formats for the supported countries
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCountryFormat;

fn patterns_for(country: Country) -> &'static [&'static str] {
    match country {
        Country::Israel => &["NN-NNN-NN", "N-NNNN-NN", "NNN-NN-NNN"],
        Country::UnitedKingdom => &["LLNN LLL"],
        Country::Netherlands => &["LL-NNN-L", "N-LLL-NN", "NN-LLL-N", "LLL-NN-L", "L-NNN-LL"],
        Country::Singapore => &["LLLNNNNL", "LLNNNNL", "LNNNNL"],
    }
}

/// OCR text without `_` padding and surrounding whitespace
pub fn strip_padding(text: &str) -> String {
    text.replace('_', "").trim().to_string()
}

fn slot_count(pattern: &str) -> usize {
    pattern.chars().filter(|c| matches!(c, 'L' | 'N')).count()
}

/// Whether an uppercase alphanumeric skeleton fits the slot classes of a pattern
pub fn fits_pattern(skeleton: &str, pattern: &str) -> bool {
    let slots: Vec<char> = pattern.chars().filter(|c| matches!(c, 'L' | 'N')).collect();
    skeleton.chars().count() == slots.len()
        && skeleton.chars().zip(slots).all(|(ch, slot)| match slot {
            'L' => ch.is_ascii_alphabetic(),
            _ => ch.is_ascii_digit(),
        })
}

/// Lay a skeleton out along a pattern, restoring its literal characters
pub fn apply_pattern(skeleton: &str, pattern: &str) -> String {
    let mut chars = skeleton.chars();
    pattern
        .chars()
        .filter_map(|p| match p {
            'L' | 'N' => chars.next(),
            literal => Some(literal),
        })
        .collect()
}

impl CountryFormat for StandardCountryFormat {
    fn extract_relevant_characters(&self, text: &str, country: Country) -> String {
        match country.alphabet() {
            PlateAlphabet::DigitsOnly => text.chars().filter(|c| c.is_ascii_digit()).collect(),
            PlateAlphabet::Alphanumeric => alphanumeric_skeleton(text),
        }
    }

    fn is_valid_format(&self, text: &str, country: Country) -> bool {
        let skeleton = alphanumeric_skeleton(text);
        patterns_for(country)
            .iter()
            .any(|pattern| fits_pattern(&skeleton, pattern))
    }

    /// Several layouts can share a slot sequence (`NN-NNN-NN`, `N-NNNN-NN`); the one
    /// whose separators the text already carries wins, else the first in order.
    fn format_if_valid(&self, text: &str, country: Country) -> Option<String> {
        let cleaned = strip_padding(text).to_ascii_uppercase();
        let skeleton = alphanumeric_skeleton(&cleaned);
        let fitting: Vec<&str> = patterns_for(country)
            .iter()
            .copied()
            .filter(|pattern| fits_pattern(&skeleton, pattern))
            .collect();
        fitting
            .iter()
            .map(|pattern| apply_pattern(&skeleton, pattern))
            .find(|formatted| *formatted == cleaned)
            .or_else(|| fitting.first().map(|pattern| apply_pattern(&skeleton, pattern)))
    }

    fn canonical_template_patterns(&self, country: Country) -> Vec<String> {
        patterns_for(country).iter().map(|p| p.to_string()).collect()
    }

    fn overread_alternatives(&self, text: &str, country: Country) -> Vec<String> {
        let relevant: Vec<char> = self
            .extract_relevant_characters(&strip_padding(text), country)
            .chars()
            .collect();
        let longest = patterns_for(country)
            .iter()
            .map(|p| slot_count(p))
            .max()
            .unwrap_or(0);
        if relevant.len() != longest + 1 {
            return Vec::new();
        }

        let without_first: String = relevant[1..].iter().collect();
        let without_last: String = relevant[..longest].iter().collect();
        [without_first, without_last]
            .iter()
            .filter_map(|option| self.format_if_valid(option, country))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_israel_formats() {
        let format = StandardCountryFormat;
        assert!(format.is_valid_format("12-345-67", Country::Israel));
        assert!(format.is_valid_format("12345678", Country::Israel));
        assert!(!format.is_valid_format("I2-E45-G7", Country::Israel));
        assert!(!format.is_valid_format("123456", Country::Israel));
        assert_eq!(
            format.format_if_valid("1234567", Country::Israel),
            Some("12-345-67".to_string())
        );
        assert_eq!(
            format.format_if_valid("12345678", Country::Israel),
            Some("123-45-678".to_string())
        );
        assert_eq!(format.format_if_valid("12-AB-67", Country::Israel), None);
    }

    #[test]
    fn test_israel_seven_digit_layouts() {
        let format = StandardCountryFormat;
        assert!(format.is_valid_format("1-2345-67", Country::Israel));
        assert_eq!(
            format.format_if_valid("1-2345-67", Country::Israel),
            Some("1-2345-67".to_string())
        );
        assert_eq!(
            format.format_if_valid("12-345-67", Country::Israel),
            Some("12-345-67".to_string())
        );
        // No separators to go by
        assert_eq!(
            format.format_if_valid("1234567", Country::Israel),
            Some("12-345-67".to_string())
        );
    }

    #[test]
    fn test_padding_is_stripped() {
        let format = StandardCountryFormat;
        assert_eq!(strip_padding(" 12_345_67__ "), "1234567");
        assert_eq!(
            format.format_if_valid("1-2345-67__", Country::Israel),
            Some("1-2345-67".to_string())
        );
    }

    #[test]
    fn test_nine_digit_overread() {
        let format = StandardCountryFormat;
        assert!(!format.is_valid_format("123456789", Country::Israel));
        assert_eq!(
            format.overread_alternatives("123456789", Country::Israel),
            vec!["234-56-789".to_string(), "123-45-678".to_string()]
        );
        assert!(format.overread_alternatives("12345678", Country::Israel).is_empty());
        assert!(format.overread_alternatives("1234567", Country::Israel).is_empty());
    }

    #[test]
    fn test_overread_for_alphanumeric_country() {
        // Singapore's longest layout has 8 slots
        let alternatives =
            StandardCountryFormat.overread_alternatives("XSBA1234A", Country::Singapore);
        assert_eq!(alternatives, vec!["SBA1234A".to_string()]);
    }

    #[test]
    fn test_extraction_by_alphabet() {
        let format = StandardCountryFormat;
        assert_eq!(
            format.extract_relevant_characters("I2-E45-G7", Country::Israel),
            "2457"
        );
        assert_eq!(
            format.extract_relevant_characters("ab12 cde", Country::UnitedKingdom),
            "AB12CDE"
        );
    }

    #[test]
    fn test_uk_and_netherlands_formats() {
        let format = StandardCountryFormat;
        assert_eq!(
            format.format_if_valid("ab12cde", Country::UnitedKingdom),
            Some("AB12 CDE".to_string())
        );
        assert!(!format.is_valid_format("AB1ZCDE", Country::UnitedKingdom));
        assert_eq!(
            format.format_if_valid("1ABC23", Country::Netherlands),
            Some("1-ABC-23".to_string())
        );
        assert!(format.is_valid_format("SBA1234A", Country::Singapore));
    }

    #[test]
    fn test_canonical_patterns() {
        let patterns = StandardCountryFormat.canonical_template_patterns(Country::Israel);
        assert_eq!(patterns, vec!["NN-NNN-NN", "N-NNNN-NN", "NNN-NN-NNN"]);
        for country in Country::ALL {
            assert!(!StandardCountryFormat.canonical_template_patterns(country).is_empty());
        }
    }
}
