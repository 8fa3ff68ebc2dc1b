//! Watchlist matching service
//!
//! Decides whether one detection hits any watchlist entry of a country:
//! 1. Snapshot the country's watchlist
//! 2. Compare colour/type directly for modes without a plate
//! 3. Build plate candidates (raw, extracted, formatted, over-read, corrected)
//! 4. Keep candidates that fit a built-in or configured format of the country
//! 5. Compare every candidate against every entry under the mode's rules
//!
//! Every failure along the way is a "no match"; nothing here returns an error.

use log::{debug, warn};

use platewatch_types::{Country, DetectionMode, PlateAlphabet};

use crate::model::{DetectedVehicle, WatchlistEntry};
use crate::repository::WatchlistRepository;
use crate::service::candidate_generator::{
    alphanumeric_skeleton, generate_candidates_with_limit, CandidateSet, DEFAULT_MAX_CANDIDATES,
};
use crate::service::country_format::{fits_pattern, strip_padding, CountryFormat};
use crate::service::template_enhancer::TemplateAwareEnhancer;

/// Matches detections against a watchlist
pub struct PlateMatcher<W, F, E> {
    watchlist: W,
    format: F,
    enhancer: E,
    max_candidates: usize,
}

impl<W, F, E> PlateMatcher<W, F, E>
where
    W: WatchlistRepository,
    F: CountryFormat,
    E: TemplateAwareEnhancer,
{
    pub fn new(watchlist: W, format: F, enhancer: E) -> Self {
        Self {
            watchlist,
            format,
            enhancer,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Whether the detection matches any entry on the country's watchlist
    pub fn find_match(
        &self,
        detected: &DetectedVehicle,
        mode: DetectionMode,
        country: Country,
        enable_candidate_generation: bool,
    ) -> bool {
        self.find_matching_entry(detected, mode, country, enable_candidate_generation)
            .is_some()
    }

    /// First watchlist entry the detection matches, if any
    pub fn find_matching_entry(
        &self,
        detected: &DetectedVehicle,
        mode: DetectionMode,
        country: Country,
        enable_candidate_generation: bool,
    ) -> Option<WatchlistEntry> {
        let entries = match self.watchlist.entries_for_country(country) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read watchlist for {}: {}", country.code(), e);
                return None;
            }
        };
        if entries.is_empty() {
            debug!("Watchlist for {} is empty", country.code());
            return None;
        }

        if !mode.requires_plate() {
            return entries
                .into_iter()
                .find(|entry| self.entry_matches(detected, entry, mode, country));
        }

        let raw = detected.plate_text()?;
        let candidates = self.plate_candidates(raw, country, enable_candidate_generation);
        let configured = self.enhancer.configured_patterns(country);
        let valid: Vec<String> = candidates
            .into_iter()
            .filter(|c| {
                self.format.is_valid_format(c, country)
                    || configured
                        .iter()
                        .any(|p| fits_pattern(&alphanumeric_skeleton(c), p))
            })
            .collect();
        if valid.is_empty() {
            debug!("No valid {} plate candidates for '{}'", country.code(), raw);
            return None;
        }
        debug!("{} valid candidates for '{}': {:?}", valid.len(), raw, valid);

        for candidate in &valid {
            let revised = detected.with_plate(candidate.as_str());
            if let Some(entry) = entries
                .iter()
                .find(|entry| self.entry_matches(&revised, entry, mode, country))
            {
                debug!("'{}' matched entry {} via '{}'", raw, entry.id, candidate);
                return Some(entry.clone());
            }
        }
        None
    }

    /// Raw text, extracted characters, formatted plate, over-read alternatives and
    /// (optionally) corrected candidates
    pub fn plate_candidates(
        &self,
        raw: &str,
        country: Country,
        enable_candidate_generation: bool,
    ) -> CandidateSet {
        let cleaned = strip_padding(raw);
        let extracted = self.format.extract_relevant_characters(&cleaned, country);

        let mut candidates = CandidateSet::new();
        candidates.insert(raw);
        if !cleaned.is_empty() {
            candidates.insert(cleaned.as_str());
        }
        candidates.insert(extracted.as_str());
        if let Some(formatted) = self.format.format_if_valid(&cleaned, country) {
            candidates.insert(formatted);
        }
        candidates.extend(self.format.overread_alternatives(&cleaned, country));
        if enable_candidate_generation {
            let mut patterns = self.format.canonical_template_patterns(country);
            for pattern in self.enhancer.configured_patterns(country) {
                if !patterns.contains(&pattern) {
                    patterns.push(pattern);
                }
            }
            candidates.extend(generate_candidates_with_limit(
                raw,
                &patterns,
                self.max_candidates,
            ));
        }
        candidates
    }

    /// Compare one detection with one entry under a detection mode
    pub fn entry_matches(
        &self,
        detected: &DetectedVehicle,
        entry: &WatchlistEntry,
        mode: DetectionMode,
        country: Country,
    ) -> bool {
        let color = || detected.color == Some(entry.color);
        let vehicle_type = || detected.vehicle_type == Some(entry.vehicle_type);
        let plate = || match (detected.plate_text(), entry.plate_text()) {
            (Some(detected_plate), Some(entry_plate)) => {
                self.plates_match(detected_plate, entry_plate, country)
            }
            _ => false,
        };

        (!mode.requires_plate() || plate())
            && (!mode.requires_color() || color())
            && (!mode.requires_type() || vehicle_type())
    }

    /// Plate comparison: fuzzy when the country has templates, strict otherwise
    pub fn plates_match(&self, detected: &str, entry: &str, country: Country) -> bool {
        if !self.enhancer.has_configured_templates(country) {
            return default_plate_match(detected, entry, country.alphabet());
        }

        let detected_norm = alphanumeric_skeleton(detected);
        let entry_norm = alphanumeric_skeleton(entry);
        if detected_norm.is_empty() || entry_norm.is_empty() {
            return false;
        }
        if detected_norm == entry_norm {
            return true;
        }

        let corrected = self
            .enhancer
            .enhance(detected, country)
            .formatted_plate
            .map(|p| alphanumeric_skeleton(&p))
            .filter(|p| !p.is_empty());
        if corrected.as_deref() == Some(entry_norm.as_str()) {
            return true;
        }

        if contains_either(&detected_norm, &entry_norm) {
            return true;
        }
        match corrected {
            Some(corrected) if corrected.len() != entry_norm.len() => {
                contains_either(&corrected, &entry_norm)
            }
            _ => false,
        }
    }
}

/// Country-default comparison used when no templates are configured
pub fn default_plate_match(detected: &str, entry: &str, alphabet: PlateAlphabet) -> bool {
    let (a, b) = match alphabet {
        PlateAlphabet::DigitsOnly => (digits_only(detected), digits_only(entry)),
        PlateAlphabet::Alphanumeric => {
            (alphanumeric_skeleton(detected), alphanumeric_skeleton(entry))
        }
    };
    !a.is_empty() && a == b
}

fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// The longer string contains the shorter one
fn contains_either(a: &str, b: &str) -> bool {
    if a.len() >= b.len() {
        a.contains(b)
    } else {
        b.contains(a)
    }
}
