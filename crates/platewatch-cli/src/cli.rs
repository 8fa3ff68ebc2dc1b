//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use platewatch_types::{Country, DetectionMode, OutputFormat, VehicleColor, VehicleType};

#[derive(Parser)]
#[command(name = "platewatch")]
#[command(version)]
#[command(about = "Match license plate detections against a vehicle watchlist")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Country to work in. Uses config value if not specified.
    #[arg(long, short = 'c', global = true)]
    pub country: Option<Country>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override (watchlist and templates)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decide whether one detection matches the watchlist
    Match {
        /// Raw plate text from OCR
        #[arg(long, short = 'p')]
        plate: Option<String>,

        /// Detected vehicle color
        #[arg(long)]
        color: Option<VehicleColor>,

        /// Detected vehicle type
        #[arg(long = "type")]
        vehicle_type: Option<VehicleType>,

        /// Detection mode. Uses config value if not specified.
        #[arg(long, short = 'm')]
        mode: Option<DetectionMode>,

        /// Skip OCR candidate generation (overrides config)
        #[arg(long)]
        no_candidates: bool,
    },

    /// Match a JSON-lines file of detections
    Scan {
        /// File with one detection per line, e.g. {"plate":"12-345-67","color":"RED"}
        input: PathBuf,

        /// Detection mode. Uses config value if not specified.
        #[arg(long, short = 'm')]
        mode: Option<DetectionMode>,

        /// Skip OCR candidate generation (overrides config)
        #[arg(long)]
        no_candidates: bool,

        /// Number of detections matched concurrently
        #[arg(long, short = 'j', default_value = "4")]
        jobs: usize,
    },

    /// Show corrected plate candidates for raw OCR text
    Candidates {
        /// Raw OCR text
        text: String,

        /// Explicit pattern(s) instead of the country's built-in formats
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Cap on candidates. Uses config value if not specified.
        #[arg(long)]
        max: Option<usize>,
    },

    /// Manage watchlist entries
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },

    /// Manage plate templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set selected country
        #[arg(long)]
        set_country: Option<Country>,

        /// Set detection mode
        #[arg(long)]
        set_mode: Option<DetectionMode>,

        /// Enable/disable OCR candidate generation
        #[arg(long)]
        set_candidates: Option<bool>,

        /// Set cap on generated candidates
        #[arg(long)]
        set_max_candidates: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchlistAction {
    /// Add a vehicle to the watchlist
    Add {
        /// Plate text (optional for color/type-only watching)
        #[arg(long, short = 'p')]
        plate: Option<String>,

        #[arg(long)]
        color: VehicleColor,

        #[arg(long = "type")]
        vehicle_type: VehicleType,

        /// Optional notes
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },

    /// List watchlist entries for the country
    List {
        /// List entries of every country
        #[arg(long)]
        all: bool,
    },

    /// Remove an entry by id
    Remove { id: String },

    /// Import entries from a TOML file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Replace the country's templates (primary, optional secondary)
    Set {
        /// Primary pattern, e.g. LLNNLLL
        #[arg(long)]
        pattern: String,

        /// Primary display name
        #[arg(long)]
        name: String,

        /// Secondary pattern
        #[arg(long, requires = "secondary_name")]
        secondary_pattern: Option<String>,

        /// Secondary display name
        #[arg(long, requires = "secondary_pattern")]
        secondary_name: Option<String>,
    },

    /// List the country's templates
    List,

    /// Remove all of the country's templates
    Clear,

    /// Validate a pattern without saving it
    Validate { pattern: String },

    /// Check plate text against the country's templates
    Check { plate: String },
}
