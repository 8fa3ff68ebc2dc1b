//! Match Service - decide detections against the stored watchlist
//!
//! Each call snapshots the configured templates, builds a matcher over the watchlist
//! repository and the built-in country formats, and returns the decision.

use log::warn;
use serde::{Deserialize, Serialize};

use platewatch_domain::model::{DetectedVehicle, WatchlistEntry};
use platewatch_domain::repository::{TemplateRepository, WatchlistRepository};
use platewatch_domain::service::{
    PlateMatcher, StandardCountryFormat, TemplateEnhancer, DEFAULT_MAX_CANDIDATES,
};
use platewatch_types::{Country, DetectionMode};

use crate::config::Config;

/// One detection plus the settings it should be matched under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub detected: DetectedVehicle,
    pub mode: DetectionMode,
    pub country: Country,
    pub enable_candidate_generation: bool,
}

impl MatchRequest {
    /// Request with default settings.
    ///
    /// The country defaults to `Country::default()` (Israel) for callers written before
    /// country selection existed; new callers should set it with [`MatchRequest::with_country`].
    pub fn new(detected: DetectedVehicle) -> Self {
        Self {
            detected,
            mode: DetectionMode::default(),
            country: Country::default(),
            enable_candidate_generation: true,
        }
    }

    /// Request using the persisted country, mode and candidate flag
    pub fn from_config(detected: DetectedVehicle, config: &Config) -> Self {
        Self {
            detected,
            mode: config.detection_mode,
            country: config.selected_country,
            enable_candidate_generation: config.candidate_generation_enabled,
        }
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = country;
        self
    }

    pub fn with_candidate_generation(mut self, enabled: bool) -> Self {
        self.enable_candidate_generation = enabled;
        self
    }
}

/// Decision for one request, with the entry that was hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matched: bool,
    pub plate: Option<String>,
    pub mode: DetectionMode,
    pub country: Country,
    pub entry: Option<WatchlistEntry>,
}

/// Matching use cases over the watchlist and template repositories
pub struct MatchService<W, T> {
    watchlist: W,
    templates: T,
    max_candidates: usize,
}

impl<W, T> MatchService<W, T>
where
    W: WatchlistRepository,
    T: TemplateRepository,
{
    pub fn new(watchlist: W, templates: T) -> Self {
        Self {
            watchlist,
            templates,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn find_match(&self, request: &MatchRequest) -> bool {
        self.evaluate(request).matched
    }

    pub fn evaluate(&self, request: &MatchRequest) -> MatchOutcome {
        let entry = self.matcher().find_matching_entry(
            &request.detected,
            request.mode,
            request.country,
            request.enable_candidate_generation,
        );
        MatchOutcome {
            matched: entry.is_some(),
            plate: request.detected.plate.clone(),
            mode: request.mode,
            country: request.country,
            entry,
        }
    }

    /// Candidates the matcher would consider for raw OCR text, valid or not
    pub fn candidates(&self, raw: &str, country: Country, enable_generation: bool) -> Vec<String> {
        self.matcher()
            .plate_candidates(raw, country, enable_generation)
            .into_vec()
    }

    fn matcher(&self) -> PlateMatcher<&W, StandardCountryFormat, TemplateEnhancer> {
        let enhancer = TemplateEnhancer::load(&self.templates).unwrap_or_else(|e| {
            warn!("Matching without templates, failed to load them: {}", e);
            TemplateEnhancer::default()
        });
        PlateMatcher::new(
            &self.watchlist,
            StandardCountryFormat,
            enhancer.with_max_candidates(self.max_candidates),
        )
        .with_max_candidates(self.max_candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_infra::persistence::{FileTemplateRepository, FileWatchlistRepository};
    use platewatch_types::{VehicleColor, VehicleType};
    use tempfile::tempdir;

    fn service(
        dir: &std::path::Path,
    ) -> MatchService<FileWatchlistRepository, FileTemplateRepository> {
        let watchlist = FileWatchlistRepository::open(dir.to_path_buf()).unwrap();
        let templates =
            FileTemplateRepository::open(dir.to_path_buf(), Country::ALL.to_vec()).unwrap();
        MatchService::new(watchlist, templates)
    }

    #[test]
    fn test_request_defaults() {
        let request = MatchRequest::new(DetectedVehicle::default());
        assert_eq!(request.country, Country::Israel);
        assert_eq!(request.mode, DetectionMode::LpOnly);
        assert!(request.enable_candidate_generation);

        let config = Config {
            selected_country: Country::Netherlands,
            detection_mode: DetectionMode::ColorOnly,
            candidate_generation_enabled: false,
            ..Config::default()
        };
        let request = MatchRequest::from_config(DetectedVehicle::default(), &config);
        assert_eq!(request.country, Country::Netherlands);
        assert_eq!(request.mode, DetectionMode::ColorOnly);
        assert!(!request.enable_candidate_generation);
    }

    #[test]
    fn test_evaluate_reports_entry() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        let entry = WatchlistEntry::new(Country::Israel, VehicleColor::Red, VehicleType::Car)
            .with_plate("12-345-67");
        service.watchlist.save(&entry).unwrap();

        let detected = DetectedVehicle::new(Some("I2-E45-G7".to_string()), None, None);
        let outcome = service.evaluate(&MatchRequest::new(detected.clone()));
        assert!(outcome.matched);
        assert_eq!(outcome.entry.map(|e| e.id), Some(entry.id));

        let strict = MatchRequest::new(detected).with_candidate_generation(false);
        assert!(!service.find_match(&strict));
    }

    #[test]
    fn test_candidates_listing() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        let candidates = service.candidates("I2-E45-G7", Country::Israel, true);
        assert_eq!(candidates[0], "I2-E45-G7");
        assert!(candidates.contains(&"12-345-67".to_string()));
    }
}
