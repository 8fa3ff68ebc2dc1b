//! Template Service - business rules for a country's template set
//!
//! Saving a set goes through these checks, in order:
//! 1. Country is known and enabled
//! 2. One or two templates supplied
//! 3. Every pattern is valid for the country
//! 4. Priorities are {1} or {1, 2}
//! 5. Patterns and display names are unique
//! 6. The whole set replaces the stored one in a single repository call

use std::collections::HashSet;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use platewatch_domain::model::Template;
use platewatch_domain::repository::TemplateRepository;
use platewatch_domain::service::template_rules::{
    check_priorities, validate_pattern_for_country, validate_template_set, ValidationResult,
    MAX_TEMPLATES_PER_COUNTRY,
};
use platewatch_types::Country;

/// Outcome of a template write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    pub message: String,
}

impl SaveResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Template use cases atop a template repository
pub struct TemplateService<R> {
    repository: R,
}

impl<R: TemplateRepository> TemplateService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Validate and atomically store a country's complete template set
    pub fn save_templates_for_country(
        &self,
        country_id: &str,
        templates: Vec<Template>,
    ) -> SaveResult {
        let country = match self.enabled_country(country_id) {
            Ok(country) => country,
            Err(message) => return SaveResult::failed(message),
        };

        if templates.is_empty() {
            return SaveResult::failed("At least one template is required");
        }
        if templates.len() > MAX_TEMPLATES_PER_COUNTRY {
            return SaveResult::failed(format!(
                "At most {} templates are allowed per country (got {})",
                MAX_TEMPLATES_PER_COUNTRY,
                templates.len()
            ));
        }

        let pattern_errors: Vec<String> = templates
            .iter()
            .flat_map(|t| {
                validate_pattern_for_country(&t.pattern, country)
                    .errors
                    .into_iter()
                    .map(move |e| format!("Template '{}': {}", t.display_name, e))
            })
            .collect();
        if !pattern_errors.is_empty() {
            return SaveResult::failed(format!(
                "Invalid template pattern(s): {}",
                pattern_errors.join("; ")
            ));
        }

        if let Err(message) = check_priorities(&templates) {
            return SaveResult::failed(message);
        }

        let mut patterns = HashSet::new();
        if let Some(duplicate) = templates.iter().find(|t| !patterns.insert(t.pattern.as_str())) {
            return SaveResult::failed(format!("Duplicate pattern '{}'", duplicate.pattern));
        }
        let mut names = HashSet::new();
        if let Some(duplicate) = templates
            .iter()
            .find(|t| !names.insert(t.display_name.as_str()))
        {
            return SaveResult::failed(format!(
                "Duplicate template name '{}'",
                duplicate.display_name
            ));
        }

        let templates: Vec<Template> = templates
            .into_iter()
            .map(|t| Template {
                country_id: country.code().to_string(),
                ..t
            })
            .collect();

        match self
            .repository
            .replace_templates_for_country(country.code(), &templates)
        {
            Ok(()) => {
                info!("Saved {} template(s) for {}", templates.len(), country.code());
                SaveResult::ok(format!(
                    "Saved {} template(s) for {}",
                    templates.len(),
                    country.display_name()
                ))
            }
            Err(e) => {
                warn!("Failed to save templates for {}: {}", country.code(), e);
                SaveResult::failed(format!("Failed to save templates: {}", e))
            }
        }
    }

    /// Remove every template for a country
    pub fn clear_templates_for_country(&self, country_id: &str) -> SaveResult {
        let country = match self.enabled_country(country_id) {
            Ok(country) => country,
            Err(message) => return SaveResult::failed(message),
        };
        match self.repository.replace_templates_for_country(country.code(), &[]) {
            Ok(()) => SaveResult::ok(format!("Cleared templates for {}", country.display_name())),
            Err(e) => SaveResult::failed(format!("Failed to clear templates: {}", e)),
        }
    }

    /// Stored templates for a country in priority order; empty if storage fails
    pub fn templates_for_country(&self, country_id: &str) -> Vec<Template> {
        match self.repository.templates_for_country(country_id) {
            Ok(mut templates) => {
                templates.sort_by_key(|t| t.priority);
                templates
            }
            Err(e) => {
                warn!("Failed to read templates for {}: {}", country_id, e);
                Vec::new()
            }
        }
    }

    /// Full set validation, warnings included, without saving
    pub fn validate_templates(&self, templates: &[Template]) -> ValidationResult {
        validate_template_set(templates)
    }

    fn enabled_country(&self, country_id: &str) -> Result<Country, String> {
        let country = Country::from_code(country_id)
            .ok_or_else(|| format!("Unknown country '{}'", country_id))?;
        match self.repository.country_enabled(country.code()) {
            Ok(true) => Ok(country),
            Ok(false) => Err(format!("Country {} is not enabled", country.display_name())),
            Err(e) => Err(format!("Failed to check country {}: {}", country.code(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_types::Error;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryTemplates {
        templates: RefCell<HashMap<String, Vec<Template>>>,
        replace_calls: Cell<usize>,
        fail_writes: bool,
    }

    impl TemplateRepository for MemoryTemplates {
        fn templates_for_country(&self, country_id: &str) -> Result<Vec<Template>, Error> {
            Ok(self.templates.borrow().get(country_id).cloned().unwrap_or_default())
        }

        fn replace_templates_for_country(
            &self,
            country_id: &str,
            templates: &[Template],
        ) -> Result<(), Error> {
            self.replace_calls.set(self.replace_calls.get() + 1);
            if self.fail_writes {
                return Err(Error::Storage("database is locked".to_string()));
            }
            self.templates
                .borrow_mut()
                .insert(country_id.to_string(), templates.to_vec());
            Ok(())
        }

        fn country_enabled(&self, country_id: &str) -> Result<bool, Error> {
            Ok(country_id != "SG")
        }

        fn find_all(&self) -> Result<Vec<Template>, Error> {
            Ok(self.templates.borrow().values().flatten().cloned().collect())
        }
    }

    fn gb(pattern: &str, name: &str, priority: u8) -> Template {
        Template::new("GB", pattern, name, priority)
    }

    #[test]
    fn test_save_two_templates() {
        let service = TemplateService::new(MemoryTemplates::default());
        let result = service.save_templates_for_country(
            "GB",
            vec![gb("LNNNLLL", "Prefix", 2), gb("LLNNLLL", "Current", 1)],
        );
        assert!(result.success, "{}", result.message);

        let stored = service.templates_for_country("GB");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].display_name, "Current");
        assert_eq!(service.repository.replace_calls.get(), 1);
    }

    #[test]
    fn test_rejects_unknown_or_disabled_country() {
        let service = TemplateService::new(MemoryTemplates::default());
        let unknown = service.save_templates_for_country("XX", vec![gb("LLNNLLL", "A", 1)]);
        assert!(!unknown.success);
        assert!(unknown.message.contains("Unknown country"));

        let disabled = service.save_templates_for_country("SG", vec![gb("LLLNNNNL", "A", 1)]);
        assert!(!disabled.success);
        assert!(disabled.message.contains("not enabled"));
        assert_eq!(service.repository.replace_calls.get(), 0);
    }

    #[test]
    fn test_rejects_template_count() {
        let service = TemplateService::new(MemoryTemplates::default());
        assert!(!service.save_templates_for_country("GB", Vec::new()).success);
        let three = vec![
            gb("LLNNLLL", "A", 1),
            gb("LNNNLLL", "B", 2),
            gb("LLLNNN", "C", 2),
        ];
        assert!(!service.save_templates_for_country("GB", three).success);
    }

    #[test]
    fn test_aggregates_pattern_errors() {
        let service = TemplateService::new(MemoryTemplates::default());
        let result = service.save_templates_for_country(
            "GB",
            vec![gb("LLLLLL", "Letters", 1), gb("NN-NN", "Dashed", 2)],
        );
        assert!(!result.success);
        assert!(result.message.contains("'Letters'"));
        assert!(result.message.contains("'Dashed'"));
    }

    #[test]
    fn test_priority_rules() {
        let service = TemplateService::new(MemoryTemplates::default());
        let single_two = service.save_templates_for_country("GB", vec![gb("LLNNLLL", "A", 2)]);
        assert!(!single_two.success);

        let both_one = service.save_templates_for_country(
            "GB",
            vec![gb("LLNNLLL", "A", 1), gb("LNNNLLL", "B", 1)],
        );
        assert!(!both_one.success);
        assert_eq!(service.repository.replace_calls.get(), 0);
    }

    #[test]
    fn test_rejects_duplicates() {
        let service = TemplateService::new(MemoryTemplates::default());
        let same_pattern = service.save_templates_for_country(
            "GB",
            vec![gb("LLNNLLL", "A", 1), gb("LLNNLLL", "B", 2)],
        );
        assert!(!same_pattern.success);
        assert!(same_pattern.message.contains("Duplicate pattern"));

        let same_name = service.save_templates_for_country(
            "GB",
            vec![gb("LLNNLLL", "A", 1), gb("LNNNLLL", "A", 2)],
        );
        assert!(!same_name.success);
        assert!(same_name.message.contains("Duplicate template name"));
    }

    #[test]
    fn test_storage_failure_becomes_result() {
        let repo = MemoryTemplates {
            fail_writes: true,
            ..Default::default()
        };
        let service = TemplateService::new(repo);
        let result = service.save_templates_for_country("GB", vec![gb("LLNNLLL", "A", 1)]);
        assert!(!result.success);
        assert!(result.message.contains("database is locked"));
    }

    #[test]
    fn test_all_digit_template_for_digits_only_country() {
        let service = TemplateService::new(MemoryTemplates::default());
        let result = service.save_templates_for_country(
            "il",
            vec![Template::new("il", "NNNNNNN", "Private", 1)],
        );
        assert!(result.success, "{}", result.message);
        assert_eq!(service.templates_for_country("IL")[0].country_id, "IL");
    }

    #[test]
    fn test_clear_templates() {
        let service = TemplateService::new(MemoryTemplates::default());
        service.save_templates_for_country("GB", vec![gb("LLNNLLL", "A", 1)]);
        assert!(service.clear_templates_for_country("GB").success);
        assert!(service.templates_for_country("GB").is_empty());
    }
}
