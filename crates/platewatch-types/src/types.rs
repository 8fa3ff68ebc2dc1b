//! Detection attributes, countries and detection modes

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Which attributes must agree for a detection to hit a watchlist entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionMode {
    #[default]
    LpOnly,
    LpColor,
    LpType,
    LpColorType,
    ColorType,
    ColorOnly,
}

impl DetectionMode {
    pub const ALL: [DetectionMode; 6] = [
        DetectionMode::LpOnly,
        DetectionMode::LpColor,
        DetectionMode::LpType,
        DetectionMode::LpColorType,
        DetectionMode::ColorType,
        DetectionMode::ColorOnly,
    ];

    pub fn requires_plate(&self) -> bool {
        match self {
            DetectionMode::LpOnly
            | DetectionMode::LpColor
            | DetectionMode::LpType
            | DetectionMode::LpColorType => true,
            DetectionMode::ColorType | DetectionMode::ColorOnly => false,
        }
    }

    pub fn requires_color(&self) -> bool {
        match self {
            DetectionMode::LpColor
            | DetectionMode::LpColorType
            | DetectionMode::ColorType
            | DetectionMode::ColorOnly => true,
            DetectionMode::LpOnly | DetectionMode::LpType => false,
        }
    }

    pub fn requires_type(&self) -> bool {
        match self {
            DetectionMode::LpType | DetectionMode::LpColorType | DetectionMode::ColorType => true,
            DetectionMode::LpOnly | DetectionMode::LpColor | DetectionMode::ColorOnly => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetectionMode::LpOnly => "Plate only",
            DetectionMode::LpColor => "Plate + color",
            DetectionMode::LpType => "Plate + type",
            DetectionMode::LpColorType => "Plate + color + type",
            DetectionMode::ColorType => "Color + type",
            DetectionMode::ColorOnly => "Color only",
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            DetectionMode::LpOnly => "LP_ONLY",
            DetectionMode::LpColor => "LP_COLOR",
            DetectionMode::LpType => "LP_TYPE",
            DetectionMode::LpColorType => "LP_COLOR_TYPE",
            DetectionMode::ColorType => "COLOR_TYPE",
            DetectionMode::ColorOnly => "COLOR_ONLY",
        };
        write!(f, "{}", code)
    }
}

/// Vehicle body color palette produced by the color classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleColor {
    White,
    Black,
    Gray,
    Silver,
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Brown,
    Beige,
    Gold,
    Purple,
}

impl VehicleColor {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleColor::White => "White",
            VehicleColor::Black => "Black",
            VehicleColor::Gray => "Gray",
            VehicleColor::Silver => "Silver",
            VehicleColor::Red => "Red",
            VehicleColor::Blue => "Blue",
            VehicleColor::Green => "Green",
            VehicleColor::Yellow => "Yellow",
            VehicleColor::Orange => "Orange",
            VehicleColor::Brown => "Brown",
            VehicleColor::Beige => "Beige",
            VehicleColor::Gold => "Gold",
            VehicleColor::Purple => "Purple",
        }
    }
}

/// Vehicle body type produced by the type classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Suv,
    Van,
    Truck,
    Bus,
    Motorcycle,
    Pickup,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Suv => "SUV",
            VehicleType::Van => "Van",
            VehicleType::Truck => "Truck",
            VehicleType::Bus => "Bus",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Pickup => "Pickup",
        }
    }
}

/// Character alphabet a country's plates are compared in when no templates exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateAlphabet {
    DigitsOnly,
    Alphanumeric,
}

/// Supported plate-issuing countries
///
/// `Default` is Israel, the country older single-country callers assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Country {
    #[default]
    #[serde(rename = "IL")]
    #[value(name = "il", alias = "israel")]
    Israel,
    #[serde(rename = "GB")]
    #[value(name = "gb", alias = "uk")]
    UnitedKingdom,
    #[serde(rename = "NL")]
    #[value(name = "nl", alias = "netherlands")]
    Netherlands,
    #[serde(rename = "SG")]
    #[value(name = "sg", alias = "singapore")]
    Singapore,
}

impl Country {
    pub const ALL: [Country; 4] = [
        Country::Israel,
        Country::UnitedKingdom,
        Country::Netherlands,
        Country::Singapore,
    ];

    /// ISO 3166 alpha-2 code, also used as the template store key
    pub fn code(&self) -> &'static str {
        match self {
            Country::Israel => "IL",
            Country::UnitedKingdom => "GB",
            Country::Netherlands => "NL",
            Country::Singapore => "SG",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Israel => "Israel",
            Country::UnitedKingdom => "United Kingdom",
            Country::Netherlands => "Netherlands",
            Country::Singapore => "Singapore",
        }
    }

    pub fn alphabet(&self) -> PlateAlphabet {
        match self {
            Country::Israel => PlateAlphabet::DigitsOnly,
            Country::UnitedKingdom | Country::Netherlands | Country::Singapore => {
                PlateAlphabet::Alphanumeric
            }
        }
    }

    /// Look up a country by code or display name, case-insensitively
    pub fn from_code(code: &str) -> Option<Country> {
        let code = code.trim();
        Country::ALL.into_iter().find(|c| {
            c.code().eq_ignore_ascii_case(code) || c.display_name().eq_ignore_ascii_case(code)
        })
    }
}

impl FromStr for Country {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::from_code(s).ok_or_else(|| Error::UnknownCountry(s.to_string()))
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_requirements() {
        assert!(DetectionMode::LpOnly.requires_plate());
        assert!(!DetectionMode::LpOnly.requires_color());
        assert!(DetectionMode::LpColorType.requires_color());
        assert!(DetectionMode::LpColorType.requires_type());
        assert!(!DetectionMode::ColorOnly.requires_plate());
        assert!(!DetectionMode::ColorOnly.requires_type());
        assert!(DetectionMode::ColorType.requires_type());
    }

    #[test]
    fn test_country_lookup() {
        assert_eq!(Country::from_code("il"), Some(Country::Israel));
        assert_eq!(Country::from_code("United Kingdom"), Some(Country::UnitedKingdom));
        assert!("XX".parse::<Country>().is_err());
        assert_eq!(Country::default(), Country::Israel);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Country::Netherlands).unwrap();
        assert_eq!(json, "\"NL\"");
        let mode: DetectionMode = serde_json::from_str("\"LP_COLOR_TYPE\"").unwrap();
        assert_eq!(mode, DetectionMode::LpColorType);
        let color: VehicleColor = serde_json::from_str("\"GREEN\"").unwrap();
        assert_eq!(color, VehicleColor::Green);
    }
}
