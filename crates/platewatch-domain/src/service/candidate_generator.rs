//! Corrected plate candidates from ambiguous OCR text
//!
//! OCR engines confuse glyphs such as `0`/`O` or `8`/`B`. Given the patterns a country's
//! plates follow, every position is known to be a letter slot or a digit slot, so a
//! misread character is only corrected towards the class its slot expects.

use std::collections::HashSet;

/// Default cap on the number of candidates produced per pattern and overall
pub const DEFAULT_MAX_CANDIDATES: usize = 2048;

/// Letters a digit is commonly misread for. `9` has none.
fn letters_for_digit(digit: char) -> &'static [char] {
    match digit {
        '0' => &['O', 'D', 'Q'],
        '1' => &['I', 'L', 'T'],
        '2' => &['Z'],
        '3' => &['E'],
        '4' => &['A'],
        '5' => &['S'],
        '6' => &['G'],
        '7' => &['T'],
        '8' => &['B'],
        _ => &[],
    }
}

/// Digits a letter is commonly misread for
fn digits_for_letter(letter: char) -> &'static [char] {
    match letter {
        'O' | 'D' | 'Q' => &['0'],
        'I' | 'L' => &['1'],
        'T' => &['1', '7'],
        'Z' => &['2'],
        'E' => &['3'],
        'A' => &['4'],
        'S' => &['5'],
        'G' => &['6'],
        'B' => &['8'],
        _ => &[],
    }
}

/// Insertion-ordered set of distinct candidate strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate; returns false when it was already present
    pub fn insert(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        if self.seen.contains(&candidate) {
            return false;
        }
        self.seen.insert(candidate.clone());
        self.items.push(candidate);
        true
    }

    pub fn extend<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for candidate in candidates {
            self.insert(candidate);
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.seen.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl IntoIterator for CandidateSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Uppercase ASCII alphanumeric skeleton of a string
pub fn alphanumeric_skeleton(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Generate corrected candidates with the default cap
pub fn generate_candidates<S: AsRef<str>>(raw: &str, patterns: &[S]) -> CandidateSet {
    generate_candidates_with_limit(raw, patterns, DEFAULT_MAX_CANDIDATES)
}

/// Generate corrected candidates for `raw` against every pattern.
///
/// At most `max_candidates` variants are built per pattern and the union across patterns is
/// capped at the same value.
pub fn generate_candidates_with_limit<S: AsRef<str>>(
    raw: &str,
    patterns: &[S],
    max_candidates: usize,
) -> CandidateSet {
    let mut result = CandidateSet::new();
    let observed: Vec<char> = alphanumeric_skeleton(raw).chars().collect();
    if observed.is_empty() || patterns.is_empty() || max_candidates == 0 {
        return result;
    }

    for pattern in patterns {
        let pattern = pattern.as_ref();
        for candidate in candidates_for_pattern(&observed, pattern, max_candidates) {
            if result.len() >= max_candidates {
                return result;
            }
            result.insert(candidate);
        }
    }
    result
}

fn candidates_for_pattern(observed: &[char], pattern: &str, max_candidates: usize) -> Vec<String> {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let type_mask: Vec<char> = pattern_chars
        .iter()
        .copied()
        .filter(|c| matches!(c, 'L' | 'N'))
        .collect();
    if type_mask.len() != observed.len() {
        return Vec::new();
    }

    let mut options: Vec<Vec<char>> = Vec::with_capacity(observed.len());
    for (&slot, &ch) in type_mask.iter().zip(observed) {
        let position_options = options_for_slot(slot, ch);
        if position_options.is_empty() {
            return Vec::new();
        }
        options.push(position_options);
    }

    bounded_product(&options, max_candidates)
        .into_iter()
        .map(|variant| reinsert_literals(&pattern_chars, &variant))
        .collect()
}

fn options_for_slot(slot: char, ch: char) -> Vec<char> {
    match slot {
        'L' if ch.is_ascii_alphabetic() => vec![ch],
        'L' => letters_for_digit(ch).to_vec(),
        _ if ch.is_ascii_digit() => vec![ch],
        _ => digits_for_letter(ch).to_vec(),
    }
}

/// Cartesian product of per-position options, never holding more than `cap` partial variants
fn bounded_product(options: &[Vec<char>], cap: usize) -> Vec<Vec<char>> {
    let mut variants: Vec<Vec<char>> = vec![Vec::with_capacity(options.len())];
    for position in options {
        let mut next = Vec::with_capacity(variants.len().saturating_mul(position.len()).min(cap));
        'expand: for variant in &variants {
            for &ch in position {
                if next.len() >= cap {
                    break 'expand;
                }
                let mut extended = variant.clone();
                extended.push(ch);
                next.push(extended);
            }
        }
        variants = next;
    }
    variants
}

fn reinsert_literals(pattern: &[char], variant: &[char]) -> String {
    let mut slots = variant.iter();
    pattern
        .iter()
        .filter_map(|&p| match p {
            'L' | 'N' => slots.next().copied(),
            literal => Some(literal),
        })
        .collect()
}
