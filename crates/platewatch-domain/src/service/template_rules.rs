//! Structural validation of plate templates

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use platewatch_types::{Country, PlateAlphabet};

use crate::model::Template;
use crate::service::candidate_generator::alphanumeric_skeleton;

pub const MIN_PATTERN_LENGTH: usize = 3;
pub const MAX_PATTERN_LENGTH: usize = 12;
pub const MAX_TEMPLATES_PER_COUNTRY: usize = 2;

const SHORT_PATTERN_WARNING: usize = 5;
const LONG_PATTERN_WARNING: usize = 10;

/// Outcome of a validation: hard errors fail it, warnings do not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate a single user-authored pattern without country context.
///
/// A pattern without letter slots only earns a warning here; see
/// [`validate_pattern_for_country`].
pub fn validate_pattern(pattern: &str) -> ValidationResult {
    validate_pattern_with(pattern, None)
}

/// Validate a pattern for a country. Countries whose plates carry letters require at least
/// one `L` slot; digits-only countries accept all-digit patterns.
pub fn validate_pattern_for_country(pattern: &str, country: Country) -> ValidationResult {
    validate_pattern_with(pattern, Some(country))
}

fn validate_pattern_with(pattern: &str, country: Option<Country>) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if pattern.is_empty() {
        errors.push("Pattern cannot be empty".to_string());
        return ValidationResult::from_parts(errors, warnings);
    }

    let length = pattern.chars().count();
    if !(MIN_PATTERN_LENGTH..=MAX_PATTERN_LENGTH).contains(&length) {
        errors.push(format!(
            "Pattern length must be between {} and {} characters (got {})",
            MIN_PATTERN_LENGTH, MAX_PATTERN_LENGTH, length
        ));
    }

    let invalid: Vec<String> = pattern
        .chars()
        .filter(|c| !matches!(c, 'L' | 'N'))
        .map(|c| format!("'{}'", c))
        .collect();
    if !invalid.is_empty() {
        errors.push(format!(
            "Pattern may only contain 'L' (letter) and 'N' (digit), found {}",
            invalid.join(", ")
        ));
    }

    let letters = pattern.chars().filter(|&c| c == 'L').count();
    let digits = pattern.chars().filter(|&c| c == 'N').count();
    if letters == 0 {
        match country {
            Some(c) if c.alphabet() == PlateAlphabet::Alphanumeric => errors.push(format!(
                "Pattern must contain at least one letter position (L) for {}",
                c.display_name()
            )),
            Some(_) => {}
            None => warnings.push("Pattern has no letter positions (L)".to_string()),
        }
    }
    if digits == 0 {
        errors.push("Pattern must contain at least one digit position (N)".to_string());
    }

    if length < SHORT_PATTERN_WARNING {
        warnings.push(format!("Pattern is unusually short ({} characters)", length));
    } else if length > LONG_PATTERN_WARNING {
        warnings.push(format!("Pattern is unusually long ({} characters)", length));
    }
    if letters > 0 && digits > 0 {
        if letters > digits * 2 {
            warnings.push(format!(
                "Pattern is letter-heavy ({} letters, {} digits)",
                letters, digits
            ));
        } else if digits > letters * 2 {
            warnings.push(format!(
                "Pattern is digit-heavy ({} digits, {} letters)",
                digits, letters
            ));
        }
    }

    ValidationResult::from_parts(errors, warnings)
}

/// Validate a country's complete template collection
pub fn validate_template_set(templates: &[Template]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if templates.is_empty() {
        errors.push("At least one template is required".to_string());
        return ValidationResult::from_parts(errors, warnings);
    }
    if templates.len() > MAX_TEMPLATES_PER_COUNTRY {
        errors.push(format!(
            "At most {} templates are allowed per country (got {})",
            MAX_TEMPLATES_PER_COUNTRY,
            templates.len()
        ));
    }

    if let Err(message) = check_priorities(templates) {
        errors.push(message);
    }

    let mut patterns = HashSet::new();
    let mut names = HashSet::new();
    for template in templates {
        if !patterns.insert(template.pattern.as_str()) {
            errors.push(format!("Duplicate pattern '{}'", template.pattern));
        }
        if !names.insert(template.display_name.as_str()) {
            errors.push(format!("Duplicate template name '{}'", template.display_name));
        }
        let result = match Country::from_code(&template.country_id) {
            Some(country) => validate_pattern_for_country(&template.pattern, country),
            None => validate_pattern(&template.pattern),
        };
        errors.extend(
            result
                .errors
                .into_iter()
                .map(|e| format!("{}: {}", template.display_name, e)),
        );
        warnings.extend(
            result
                .warnings
                .into_iter()
                .map(|w| format!("{}: {}", template.display_name, w)),
        );
    }

    if let [first, second] = templates {
        let a = first.pattern.chars().count();
        let b = second.pattern.chars().count();
        if a.abs_diff(b) <= 1 {
            warnings.push(format!(
                "Templates '{}' and '{}' have similar lengths ({} and {}); plates may match either",
                first.display_name, second.display_name, a, b
            ));
        }
    }

    ValidationResult::from_parts(errors, warnings)
}

/// Priorities must be exactly {1} for one template or {1, 2} for two
pub fn check_priorities(templates: &[Template]) -> Result<(), String> {
    let mut priorities: Vec<u8> = templates.iter().map(|t| t.priority).collect();
    priorities.sort_unstable();
    match priorities.as_slice() {
        [1] | [1, 2] => Ok(()),
        [_] => Err("A single template must have priority 1".to_string()),
        [_, _] => Err(format!(
            "Two templates must have priorities 1 and 2 (got {} and {})",
            priorities[0], priorities[1]
        )),
        _ => Err(format!("Invalid priority assignment {:?}", priorities)),
    }
}

/// Check plate text position by position against a template
pub fn validate_plate_against_template(text: &str, template: &Template) -> ValidationResult {
    let plate: Vec<char> = alphanumeric_skeleton(text).chars().collect();
    let slots: Vec<char> = template.pattern.chars().collect();

    if plate.len() != slots.len() {
        return ValidationResult::from_parts(
            vec![format!(
                "Length mismatch: expected {} characters, got {}",
                slots.len(),
                plate.len()
            )],
            Vec::new(),
        );
    }

    let errors = plate
        .iter()
        .zip(&slots)
        .enumerate()
        .filter_map(|(i, (&ch, &slot))| match slot {
            'L' if !ch.is_ascii_alphabetic() => Some(format!(
                "Position {}: expected a letter, got '{}'",
                i + 1,
                ch
            )),
            'N' if !ch.is_ascii_digit() => Some(format!(
                "Position {}: expected a digit, got '{}'",
                i + 1,
                ch
            )),
            _ => None,
        })
        .collect();

    ValidationResult::from_parts(errors, Vec::new())
}

/// Human-readable summary such as "2 letters, 3 digits (LLNNN)"
pub fn describe_pattern(pattern: &str) -> String {
    let letters = pattern.chars().filter(|&c| c == 'L').count();
    let digits = pattern.chars().filter(|&c| c == 'N').count();
    format!(
        "{} letter{}, {} digit{} ({})",
        letters,
        if letters == 1 { "" } else { "s" },
        digits,
        if digits == 1 { "" } else { "s" },
        pattern
    )
}

/// Anchored regex-style form of a pattern, e.g. `^[A-Z]{2}[0-9]{3}$`
pub fn matching_pattern(pattern: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let current = chars[i];
        let run = chars[i..].iter().take_while(|&&c| c == current).count();
        let class = match current {
            'L' => "[A-Z]".to_string(),
            'N' => "[0-9]".to_string(),
            literal if literal.is_ascii_alphanumeric() => literal.to_string(),
            literal => format!("\\{}", literal),
        };
        out.push_str(&class);
        if run > 1 {
            out.push_str(&format!("{{{}}}", run));
        }
        i += run;
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(pattern: &str, name: &str, priority: u8) -> Template {
        Template::new("GB", pattern, name, priority)
    }

    #[test]
    fn test_pattern_validation() {
        assert!(validate_pattern("LLNNLLL").is_valid);
        assert!(!validate_pattern("NNNNNN1").is_valid);
        assert!(!validate_pattern("LLLLLL").is_valid);
        assert!(!validate_pattern("").is_valid);
        assert!(!validate_pattern("LN").is_valid);
        assert!(!validate_pattern("LNLNLNLNLNLNL").is_valid);
        assert!(!validate_pattern("LL-NNN").is_valid);
    }

    #[test]
    fn test_all_digit_pattern_depends_on_country() {
        let result = validate_pattern("NNNNNN");
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("no letter positions")));

        assert!(validate_pattern_for_country("NNNNNNN", Country::Israel).is_valid);

        let result = validate_pattern_for_country("NNNNNN", Country::UnitedKingdom);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("letter"));
    }

    #[test]
    fn test_illegal_character_reported() {
        let result = validate_pattern("NNNNNN1");
        assert!(result.errors.iter().any(|e| e.contains("'1'")));
    }

    #[test]
    fn test_pattern_warnings() {
        let short = validate_pattern("LNN");
        assert!(short.is_valid);
        assert!(short.warnings.iter().any(|w| w.contains("short")));

        let long = validate_pattern("LLLLLNNNNNN");
        assert!(long.is_valid);
        assert!(long.warnings.iter().any(|w| w.contains("long")));

        let digit_heavy = validate_pattern("LNNNNNN");
        assert!(digit_heavy.warnings.iter().any(|w| w.contains("digit-heavy")));

        let balanced = validate_pattern("LLNNNLL");
        assert!(balanced.warnings.is_empty());
    }

    #[test]
    fn test_set_priorities() {
        let duplicate = vec![template("LLNNLLL", "Current", 1), template("LNNNLLL", "Old", 1)];
        assert!(!validate_template_set(&duplicate).is_valid);

        let ok = vec![template("LLNNLLL", "Current", 1), template("LNNNNLL", "Old", 2)];
        assert!(validate_template_set(&ok).is_valid);

        let single_two = vec![template("LLNNLLL", "Current", 2)];
        assert!(!validate_template_set(&single_two).is_valid);

        let gap = vec![template("LLNNLLL", "Current", 1), template("LNNNNLL", "Old", 3)];
        assert!(!validate_template_set(&gap).is_valid);
    }

    #[test]
    fn test_set_duplicates_and_size() {
        let same_pattern = vec![template("LLNNLLL", "A", 1), template("LLNNLLL", "B", 2)];
        let result = validate_template_set(&same_pattern);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Duplicate pattern")));

        let same_name = vec![template("LLNNLLL", "A", 1), template("LNNNLL", "A", 2)];
        assert!(!validate_template_set(&same_name).is_valid);

        let three = vec![
            template("LLNNLLL", "A", 1),
            template("LNNNLL", "B", 2),
            template("LLLNNN", "C", 2),
        ];
        assert!(!validate_template_set(&three).is_valid);

        assert!(!validate_template_set(&[]).is_valid);
    }

    #[test]
    fn test_set_member_errors_prefixed() {
        let set = vec![template("LLLLLL", "Letters", 1)];
        let result = validate_template_set(&set);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.starts_with("Letters:")));

        let digits_gb = vec![template("NNNNNN", "Digits", 1)];
        assert!(!validate_template_set(&digits_gb).is_valid);

        let digits_il = vec![Template::new("IL", "NNNNNNN", "Private", 1)];
        assert!(validate_template_set(&digits_il).is_valid);
    }

    #[test]
    fn test_similar_lengths_warn_without_failing() {
        let set = vec![template("LLNNLLL", "Current", 1), template("LNNNLL", "Old", 2)];
        let result = validate_template_set(&set);
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("similar lengths")));

        let distinct = vec![template("LLNNLLL", "Current", 1), template("LNNN", "Short", 2)];
        let result = validate_template_set(&distinct);
        assert!(!result.warnings.iter().any(|w| w.contains("similar lengths")));
    }

    #[test]
    fn test_plate_against_template() {
        let t = template("LLNNLLL", "Current", 1);
        assert!(validate_plate_against_template("ab12 cde", &t).is_valid);

        let wrong_class = validate_plate_against_template("AB1ZCDE", &t);
        assert!(!wrong_class.is_valid);
        assert_eq!(wrong_class.errors.len(), 1);
        assert!(wrong_class.errors[0].contains("Position 4"));

        let short = validate_plate_against_template("AB12", &t);
        assert_eq!(short.errors.len(), 1);
        assert!(short.errors[0].contains("Length mismatch"));
    }

    #[test]
    fn test_derived_fields() {
        assert_eq!(describe_pattern("LLNNN"), "2 letters, 3 digits (LLNNN)");
        assert_eq!(describe_pattern("LNNN"), "1 letter, 3 digits (LNNN)");
        assert_eq!(matching_pattern("LLNNN"), "^[A-Z]{2}[0-9]{3}$");
        assert_eq!(matching_pattern("NN-NNN"), "^[0-9]{2}\\-[0-9]{3}$");

        let t = Template::new("NL", "NNLLLN", "Sidecode 9", 1);
        assert_eq!(t.matching_pattern, "^[0-9]{2}[A-Z]{3}[0-9]$");
    }
}
