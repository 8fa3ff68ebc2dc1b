//! Configuration management for platewatch
//!
//! Config stored at: ~/.config/platewatch/config.json

use platewatch_domain::service::DEFAULT_MAX_CANDIDATES;
use platewatch_types::{ConfigError, Country, DetectionMode, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Country detections are matched in
    #[serde(default)]
    pub selected_country: Country,

    /// Attributes that must agree for a match
    #[serde(default)]
    pub detection_mode: DetectionMode,

    /// Generate corrected OCR candidates before matching
    #[serde(default = "default_true")]
    pub candidate_generation_enabled: bool,

    /// Cap on generated candidates per pattern
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Countries templates may be configured for
    #[serde(default = "default_enabled_countries")]
    pub enabled_countries: Vec<Country>,

    /// Data directory override (watchlist and templates)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_true() -> bool {
    true
}

fn default_max_candidates() -> usize {
    DEFAULT_MAX_CANDIDATES
}

fn default_enabled_countries() -> Vec<Country> {
    Country::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_country: Country::default(),
            detection_mode: DetectionMode::default(),
            candidate_generation_enabled: true,
            max_candidates: default_max_candidates(),
            enabled_countries: default_enabled_countries(),
            data_dir: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("platewatch");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("platewatch");
        Ok(data_dir)
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a file, or create default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Platewatch Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Country:          {} ({})",
            self.selected_country,
            self.selected_country.code()
        )?;
        writeln!(
            f,
            "Detection mode:   {} ({})",
            self.detection_mode,
            self.detection_mode.label()
        )?;
        writeln!(f, "Candidates:       {}", self.candidate_generation_enabled)?;
        writeln!(f, "Max candidates:   {}", self.max_candidates)?;
        let enabled: Vec<&str> = self.enabled_countries.iter().map(|c| c.code()).collect();
        writeln!(f, "Enabled:          {}", enabled.join(", "))?;
        writeln!(
            f,
            "Data dir:         {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:    {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
