//! Use cases

pub mod match_service;
pub mod template_service;

pub use match_service::{MatchOutcome, MatchRequest, MatchService};
pub use template_service::{SaveResult, TemplateService};
