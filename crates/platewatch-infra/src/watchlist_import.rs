//! Watchlist import from TOML
//!
//! ```toml
//! [[vehicles]]
//! plate = "12-345-67"
//! color = "RED"
//! type = "CAR"
//! country = "IL"
//! notes = "optional"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use platewatch_domain::model::WatchlistEntry;
use platewatch_types::{ConfigError, Country, Error, Result, VehicleColor, VehicleType};

/// Container for parsing a watchlist TOML file
#[derive(Debug, Deserialize)]
struct WatchlistFile {
    #[serde(default)]
    vehicles: Vec<ImportedVehicle>,
}

#[derive(Debug, Deserialize)]
struct ImportedVehicle {
    #[serde(default)]
    plate: Option<String>,
    color: VehicleColor,
    #[serde(rename = "type")]
    vehicle_type: VehicleType,
    /// Falls back to the importer's default country
    #[serde(default)]
    country: Option<Country>,
    #[serde(default)]
    notes: Option<String>,
}

/// Load watchlist entries from a TOML file
pub fn load_watchlist_toml(path: &Path, default_country: Country) -> Result<Vec<WatchlistEntry>> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to read watchlist file: {}",
            e
        )))
    })?;
    parse_watchlist_toml(&content, default_country)
}

/// Parse watchlist entries from a TOML string
pub fn parse_watchlist_toml(
    content: &str,
    default_country: Country,
) -> Result<Vec<WatchlistEntry>> {
    let file: WatchlistFile = toml::from_str(content).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to parse watchlist TOML: {}",
            e
        )))
    })?;

    Ok(file
        .vehicles
        .into_iter()
        .map(|v| {
            let mut entry =
                WatchlistEntry::new(v.country.unwrap_or(default_country), v.color, v.vehicle_type);
            entry.plate = v.plate.filter(|p| !p.trim().is_empty());
            entry.notes = v.notes;
            entry
        })
        .collect())
}
