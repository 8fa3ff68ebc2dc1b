//! User-defined plate format for a country

use serde::{Deserialize, Serialize};

use crate::service::template_rules::{describe_pattern, matching_pattern};

/// Plate template.
///
/// `pattern` is read position by position: `L` is a letter slot, `N` a digit slot, and any
/// other character is a fixed literal such as a separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Country code the template belongs to (e.g. "IL")
    pub country_id: String,
    pub pattern: String,
    pub display_name: String,
    /// 1 = primary, 2 = secondary
    pub priority: u8,
    pub description: String,
    pub matching_pattern: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Template {
    /// Build a template, deriving its description and matching pattern
    pub fn new(
        country_id: impl Into<String>,
        pattern: impl Into<String>,
        display_name: impl Into<String>,
        priority: u8,
    ) -> Self {
        let pattern = pattern.into();
        Self {
            country_id: country_id.into(),
            description: describe_pattern(&pattern),
            matching_pattern: matching_pattern(&pattern),
            pattern,
            display_name: display_name.into(),
            priority,
            created_at: chrono::Utc::now(),
        }
    }
}
