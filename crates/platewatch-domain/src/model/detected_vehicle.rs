use serde::{Deserialize, Serialize};

use platewatch_types::{VehicleColor, VehicleType};

/// One vehicle as seen in a single processed frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedVehicle {
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub color: Option<VehicleColor>,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<VehicleType>,
}

impl DetectedVehicle {
    pub fn new(
        plate: Option<String>,
        color: Option<VehicleColor>,
        vehicle_type: Option<VehicleType>,
    ) -> Self {
        Self {
            plate,
            color,
            vehicle_type,
        }
    }

    /// Copy of this detection with the plate text replaced
    pub fn with_plate(&self, plate: impl Into<String>) -> Self {
        Self {
            plate: Some(plate.into()),
            ..self.clone()
        }
    }

    /// Plate text, if present and not blank
    pub fn plate_text(&self) -> Option<&str> {
        self.plate.as_deref().filter(|p| !p.trim().is_empty())
    }
}
