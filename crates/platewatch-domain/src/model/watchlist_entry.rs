//! Watchlist entry type definitions

use serde::{Deserialize, Serialize};

use platewatch_types::{Country, VehicleColor, VehicleType};

/// A vehicle of interest stored on the watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Unique identifier
    pub id: String,
    /// Plate text as entered by the user (separators allowed)
    #[serde(default)]
    pub plate: Option<String>,
    pub color: VehicleColor,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub country: Country,
    /// Notes/memo
    #[serde(default)]
    pub notes: Option<String>,
    /// When added
    pub added_at: chrono::DateTime<chrono::Utc>,
}

impl WatchlistEntry {
    pub fn new(country: Country, color: VehicleColor, vehicle_type: VehicleType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            plate: None,
            color,
            vehicle_type,
            country,
            notes: None,
            added_at: chrono::Utc::now(),
        }
    }

    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.plate = Some(plate.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn plate_text(&self) -> Option<&str> {
        self.plate.as_deref().filter(|p| !p.trim().is_empty())
    }
}
