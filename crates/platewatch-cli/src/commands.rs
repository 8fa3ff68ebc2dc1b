//! Command handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::cli::{Cli, Commands, TemplateAction, WatchlistAction};
use crate::output::{
    output_candidates, output_entries, output_outcome, output_save, output_scan,
    output_templates, output_validation,
};
use platewatch_app::app::{MatchOutcome, MatchRequest, MatchService, TemplateService};
use platewatch_app::config::Config;
use platewatch_app::repository::{open_template_repo, open_watchlist_repo};
use platewatch_domain::model::{DetectedVehicle, Template, WatchlistEntry};
use platewatch_domain::repository::{TemplateRepository, WatchlistRepository};
use platewatch_domain::service::template_rules::validate_plate_against_template;
use platewatch_domain::service::{
    generate_candidates_with_limit, validate_pattern_for_country, ValidationResult,
};
use platewatch_infra::watchlist_import::load_watchlist_toml;
use platewatch_types::{
    Country, DetectionMode, Error, OutputFormat, Result, VehicleColor, VehicleType,
};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    let country = cli.country.unwrap_or(config.selected_country);
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Match {
            plate,
            color,
            vehicle_type,
            mode,
            no_candidates,
        } => {
            let detected = DetectedVehicle::new(plate.clone(), *color, *vehicle_type);
            let request = MatchRequest::from_config(detected, &config)
                .with_country(country)
                .with_mode(mode.unwrap_or(config.detection_mode))
                .with_candidate_generation(!no_candidates && config.candidate_generation_enabled);
            cmd_match(&config, request, output_format)
        }

        Commands::Scan {
            input,
            mode,
            no_candidates,
            jobs,
        } => {
            let mode = mode.unwrap_or(config.detection_mode);
            let candidates = !no_candidates && config.candidate_generation_enabled;
            cmd_scan(
                &config,
                input.clone(),
                country,
                mode,
                candidates,
                (*jobs).max(1),
                output_format,
            )
        }

        Commands::Candidates {
            text,
            patterns,
            max,
        } => {
            let max = max.unwrap_or(config.max_candidates);
            cmd_candidates(&config, text, country, patterns, max, output_format)
        }

        Commands::Watchlist { action } => match action {
            WatchlistAction::Add {
                plate,
                color,
                vehicle_type,
                notes,
            } => cmd_watchlist_add(
                &config,
                country,
                plate.clone(),
                *color,
                *vehicle_type,
                notes.clone(),
                output_format,
            ),
            WatchlistAction::List { all } => {
                cmd_watchlist_list(&config, country, *all, output_format)
            }
            WatchlistAction::Remove { id } => cmd_watchlist_remove(&config, id),
            WatchlistAction::Import { file } => cmd_watchlist_import(&config, file, country),
        },

        Commands::Template { action } => match action {
            TemplateAction::Set {
                pattern,
                name,
                secondary_pattern,
                secondary_name,
            } => {
                let mut templates = vec![Template::new(country.code(), pattern, name, 1)];
                if let (Some(pattern), Some(name)) = (secondary_pattern, secondary_name) {
                    templates.push(Template::new(country.code(), pattern, name, 2));
                }
                cmd_template_set(&config, country, templates, output_format)
            }
            TemplateAction::List => {
                let service = TemplateService::new(open_template_repo(&config)?);
                output_templates(output_format, &service.templates_for_country(country.code()))
            }
            TemplateAction::Clear => {
                let service = TemplateService::new(open_template_repo(&config)?);
                let result = service.clear_templates_for_country(country.code());
                output_save(output_format, &result)?;
                if result.success {
                    Ok(())
                } else {
                    Err(Error::InvalidInput(result.message))
                }
            }
            TemplateAction::Validate { pattern } => {
                output_validation(output_format, &validate_pattern_for_country(pattern, country))
            }
            TemplateAction::Check { plate } => {
                cmd_template_check(&config, country, plate, output_format)
            }
        },

        Commands::Config {
            show,
            set_country,
            set_mode,
            set_candidates,
            set_max_candidates,
            set_output,
            reset,
        } => cmd_config(
            *show,
            *set_country,
            *set_mode,
            *set_candidates,
            *set_max_candidates,
            *set_output,
            *reset,
        ),
    }
}

fn cmd_match(config: &Config, request: MatchRequest, output_format: OutputFormat) -> Result<()> {
    let service = MatchService::new(open_watchlist_repo(config)?, open_template_repo(config)?)
        .with_max_candidates(config.max_candidates);

    debug!(
        "Matching {:?} in {} ({})",
        request.detected.plate, request.country, request.mode
    );
    let outcome = service.evaluate(&request);
    output_outcome(output_format, &outcome)
}

/// Read JSON-lines detections; blank lines are skipped
fn read_detections(input: &Path) -> Result<Vec<DetectedVehicle>> {
    let content = std::fs::read_to_string(input)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                Error::InvalidInput(format!("{}:{}: {}", input.display(), i + 1, e))
            })
        })
        .collect()
}

fn cmd_scan(
    config: &Config,
    input: PathBuf,
    country: Country,
    mode: DetectionMode,
    enable_candidates: bool,
    jobs: usize,
    output_format: OutputFormat,
) -> Result<()> {
    let detections = read_detections(&input)?;
    if detections.is_empty() {
        println!("No detections found in {}", input.display());
        return Ok(());
    }

    info!("Scanning {} detections with {} jobs", detections.len(), jobs);

    let service = Arc::new(
        MatchService::new(open_watchlist_repo(config)?, open_template_repo(config)?)
            .with_max_candidates(config.max_candidates),
    );

    let outcomes = scan_detections(service, detections, country, mode, enable_candidates, jobs)?;
    output_scan(output_format, &outcomes)
}

/// Match detections on a blocking pool, at most `jobs` at a time; outcomes keep input order
fn scan_detections<W, T>(
    service: Arc<MatchService<W, T>>,
    detections: Vec<DetectedVehicle>,
    country: Country,
    mode: DetectionMode,
    enable_candidates: bool,
    jobs: usize,
) -> Result<Vec<MatchOutcome>>
where
    W: WatchlistRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let semaphore = Arc::new(Semaphore::new(jobs));
        let mut handles = Vec::with_capacity(detections.len());

        for detected in detections {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::Task(e.to_string()))?;
            let service = Arc::clone(&service);
            let request = MatchRequest::new(detected)
                .with_country(country)
                .with_mode(mode)
                .with_candidate_generation(enable_candidates);

            handles.push(tokio::task::spawn_blocking(move || {
                let outcome = service.evaluate(&request);
                drop(permit);
                outcome
            }));
        }

        // Awaiting in spawn order keeps results in input order
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.map_err(|e| Error::Task(e.to_string()))?);
        }
        Ok::<_, Error>(outcomes)
    })
}

fn cmd_candidates(
    config: &Config,
    text: &str,
    country: Country,
    patterns: &[String],
    max: usize,
    output_format: OutputFormat,
) -> Result<()> {
    let candidates = if patterns.is_empty() {
        let service = MatchService::new(open_watchlist_repo(config)?, open_template_repo(config)?)
            .with_max_candidates(max);
        service.candidates(text, country, true)
    } else {
        generate_candidates_with_limit(text, patterns, max).into_vec()
    };
    output_candidates(output_format, text, &candidates)
}

fn cmd_watchlist_add(
    config: &Config,
    country: Country,
    plate: Option<String>,
    color: VehicleColor,
    vehicle_type: VehicleType,
    notes: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_watchlist_repo(config)?;

    let mut entry = WatchlistEntry::new(country, color, vehicle_type);
    if let Some(plate) = plate.filter(|p| !p.trim().is_empty()) {
        entry = entry.with_plate(plate);
    }
    if let Some(notes) = notes {
        entry = entry.with_notes(notes);
    }

    repo.save(&entry)?;
    info!("Added watchlist entry {}", entry.id);

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "Added {} ({} entries in {})",
            entry.id,
            repo.count(),
            repo.store_path().display()
        );
    }
    Ok(())
}

fn cmd_watchlist_list(
    config: &Config,
    country: Country,
    all: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_watchlist_repo(config)?;
    let entries = if all {
        repo.find_all()?
    } else {
        repo.entries_for_country(country)?
    };
    output_entries(output_format, &entries)
}

fn cmd_watchlist_remove(config: &Config, id: &str) -> Result<()> {
    let repo = open_watchlist_repo(config)?;
    if repo.remove(id)? {
        println!("Removed {}", id);
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("No watchlist entry with id '{}'", id)))
    }
}

fn cmd_watchlist_import(config: &Config, file: &Path, default_country: Country) -> Result<()> {
    let entries = load_watchlist_toml(file, default_country)?;
    let repo = open_watchlist_repo(config)?;

    let mut imported = 0;
    for entry in &entries {
        match repo.save(entry) {
            Ok(()) => imported += 1,
            Err(e) => warn!("Skipping entry {}: {}", entry.id, e),
        }
    }

    println!(
        "Imported {} of {} entries from {}",
        imported,
        entries.len(),
        file.display()
    );
    Ok(())
}

fn cmd_template_set(
    config: &Config,
    country: Country,
    templates: Vec<Template>,
    output_format: OutputFormat,
) -> Result<()> {
    let service = TemplateService::new(open_template_repo(config)?);

    let preview = service.validate_templates(&templates);
    for warning in &preview.warnings {
        eprintln!("Warning: {}", warning);
    }

    let result = service.save_templates_for_country(country.code(), templates);
    output_save(output_format, &result)?;
    if result.success {
        Ok(())
    } else {
        Err(Error::InvalidInput(result.message))
    }
}

fn cmd_template_check(
    config: &Config,
    country: Country,
    plate: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let service = TemplateService::new(open_template_repo(config)?);
    let templates = service.templates_for_country(country.code());
    if templates.is_empty() {
        return Err(Error::InvalidInput(format!(
            "No templates configured for {}",
            country.display_name()
        )));
    }

    let results: Vec<(String, ValidationResult)> = templates
        .iter()
        .map(|t| (t.display_name.clone(), validate_plate_against_template(plate, t)))
        .collect();

    if output_format == OutputFormat::Json {
        let json: Vec<serde_json::Value> = results
            .iter()
            .map(|(name, result)| serde_json::json!({ "template": name, "result": result }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    for (name, result) in &results {
        println!("{}:", name);
        output_validation(output_format, result)?;
    }
    Ok(())
}

fn cmd_config(
    show: bool,
    set_country: Option<Country>,
    set_mode: Option<DetectionMode>,
    set_candidates: Option<bool>,
    set_max_candidates: Option<usize>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(country) = set_country {
        config.selected_country = country;
        modified = true;
    }

    if let Some(mode) = set_mode {
        config.detection_mode = mode;
        modified = true;
    }

    if let Some(enabled) = set_candidates {
        config.candidate_generation_enabled = enabled;
        modified = true;
    }

    if let Some(max) = set_max_candidates {
        config.max_candidates = max;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
