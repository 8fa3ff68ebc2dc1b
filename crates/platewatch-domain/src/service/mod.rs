//! Domain services

pub mod candidate_generator;
pub mod country_format;
pub mod plate_matcher;
pub mod template_enhancer;
pub mod template_rules;

pub use candidate_generator::{
    alphanumeric_skeleton, generate_candidates, generate_candidates_with_limit, CandidateSet,
    DEFAULT_MAX_CANDIDATES,
};
pub use country_format::{CountryFormat, StandardCountryFormat};
pub use plate_matcher::{default_plate_match, PlateMatcher};
pub use template_enhancer::{EnhancementResult, TemplateAwareEnhancer, TemplateEnhancer};
pub use template_rules::{
    validate_pattern, validate_pattern_for_country, validate_plate_against_template,
    validate_template_set, ValidationResult,
};
