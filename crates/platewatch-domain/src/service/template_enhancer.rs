//! Template-aware OCR correction using the user's configured templates

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use platewatch_types::{Country, Error};

use crate::model::Template;
use crate::repository::TemplateRepository;
use crate::service::candidate_generator::{
    alphanumeric_skeleton, generate_candidates_with_limit, DEFAULT_MAX_CANDIDATES,
};
use crate::service::country_format::{apply_pattern, fits_pattern};

/// Result of applying configured templates to OCR text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub is_valid_format: bool,
    pub formatted_plate: Option<String>,
}

/// Applies configured per-country templates to OCR text
pub trait TemplateAwareEnhancer {
    fn has_configured_templates(&self, country: Country) -> bool;

    /// Configured patterns for the country, highest priority first
    fn configured_patterns(&self, country: Country) -> Vec<String>;

    fn enhance(&self, text: &str, country: Country) -> EnhancementResult;
}

/// Enhancer over an in-memory snapshot of the template store
#[derive(Debug, Clone, Default)]
pub struct TemplateEnhancer {
    by_country: HashMap<String, Vec<Template>>,
    max_candidates: usize,
}

impl TemplateEnhancer {
    pub fn new(templates: Vec<Template>) -> Self {
        let mut by_country: HashMap<String, Vec<Template>> = HashMap::new();
        for template in templates {
            by_country
                .entry(template.country_id.to_ascii_uppercase())
                .or_default()
                .push(template);
        }
        for list in by_country.values_mut() {
            list.sort_by_key(|t| t.priority);
        }
        Self {
            by_country,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    /// Snapshot every configured template from a repository
    pub fn load<R: TemplateRepository>(repository: &R) -> Result<Self, Error> {
        Ok(Self::new(repository.find_all()?))
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Templates for a country in priority order
    pub fn templates(&self, country: Country) -> &[Template] {
        self.by_country
            .get(country.code())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl TemplateAwareEnhancer for TemplateEnhancer {
    fn has_configured_templates(&self, country: Country) -> bool {
        !self.templates(country).is_empty()
    }

    fn configured_patterns(&self, country: Country) -> Vec<String> {
        self.templates(country)
            .iter()
            .map(|t| t.pattern.clone())
            .collect()
    }

    fn enhance(&self, text: &str, country: Country) -> EnhancementResult {
        let templates = self.templates(country);
        let skeleton = alphanumeric_skeleton(text);
        if templates.is_empty() || skeleton.is_empty() {
            return EnhancementResult::default();
        }

        if let Some(template) = templates.iter().find(|t| fits_pattern(&skeleton, &t.pattern)) {
            return EnhancementResult {
                is_valid_format: true,
                formatted_plate: Some(apply_pattern(&skeleton, &template.pattern)),
            };
        }

        let patterns: Vec<&str> = templates.iter().map(|t| t.pattern.as_str()).collect();
        let candidates = generate_candidates_with_limit(&skeleton, &patterns, self.max_candidates);
        match candidates.into_iter().next() {
            Some(corrected) => {
                debug!("Template correction for {}: {} -> {}", country.code(), text, corrected);
                EnhancementResult {
                    is_valid_format: true,
                    formatted_plate: Some(corrected),
                }
            }
            None => EnhancementResult::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk_enhancer() -> TemplateEnhancer {
        TemplateEnhancer::new(vec![
            Template::new("GB", "LNNNLLL", "Prefix", 2),
            Template::new("GB", "LLNNLLL", "Current", 1),
        ])
    }

    #[test]
    fn test_has_configured_templates() {
        let enhancer = uk_enhancer();
        assert!(enhancer.has_configured_templates(Country::UnitedKingdom));
        assert!(!enhancer.has_configured_templates(Country::Israel));
        assert_eq!(enhancer.templates(Country::UnitedKingdom)[0].display_name, "Current");
        assert_eq!(
            enhancer.configured_patterns(Country::UnitedKingdom),
            vec!["LLNNLLL".to_string(), "LNNNLLL".to_string()]
        );
        assert!(enhancer.configured_patterns(Country::Israel).is_empty());
    }

    #[test]
    fn test_enhance_keeps_valid_text() {
        let result = uk_enhancer().enhance("ab12 cde", Country::UnitedKingdom);
        assert!(result.is_valid_format);
        assert_eq!(result.formatted_plate.as_deref(), Some("AB12CDE"));
    }

    #[test]
    fn test_enhance_corrects_confusions() {
        // '8' in a letter slot and 'O' in a digit slot
        let result = uk_enhancer().enhance("A8O2CDE", Country::UnitedKingdom);
        assert!(result.is_valid_format);
        assert_eq!(result.formatted_plate.as_deref(), Some("AB02CDE"));
    }

    #[test]
    fn test_enhance_without_templates() {
        let result = uk_enhancer().enhance("1234567", Country::Israel);
        assert_eq!(result, EnhancementResult::default());

        let result = uk_enhancer().enhance("XX", Country::UnitedKingdom);
        assert!(!result.is_valid_format);
        assert!(result.formatted_plate.is_none());
    }
}
