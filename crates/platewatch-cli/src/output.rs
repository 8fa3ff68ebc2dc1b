//! Output formatting module

use platewatch_app::app::{MatchOutcome, SaveResult};
use platewatch_domain::model::{Template, WatchlistEntry};
use platewatch_domain::service::ValidationResult;
use platewatch_types::{OutputFormat, Result};

pub fn output_outcome(output_format: OutputFormat, outcome: &MatchOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("\nMatch Result");
    println!("============");
    println!("Plate:           {}", outcome.plate.as_deref().unwrap_or("-"));
    println!("Country:         {}", outcome.country);
    println!("Mode:            {} ({})", outcome.mode, outcome.mode.label());
    println!("Matched:         {}", if outcome.matched { "Yes" } else { "No" });

    if let Some(ref entry) = outcome.entry {
        println!("\n--- Watchlist Entry ---");
        print_entry_detail(entry);
    }

    Ok(())
}

pub fn output_scan(output_format: OutputFormat, outcomes: &[MatchOutcome]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        return Ok(());
    }

    println!("{:<5} {:<14} {:<8} {:<38}", "#", "Plate", "Matched", "Entry");
    println!("{}", "-".repeat(68));
    for (i, outcome) in outcomes.iter().enumerate() {
        println!(
            "{:<5} {:<14} {:<8} {:<38}",
            i + 1,
            truncate(outcome.plate.as_deref().unwrap_or("-"), 14),
            if outcome.matched { "Yes" } else { "No" },
            outcome.entry.as_ref().map(|e| e.id.as_str()).unwrap_or("-")
        );
    }

    let hits = outcomes.iter().filter(|o| o.matched).count();
    println!("\n{} of {} detections matched", hits, outcomes.len());
    Ok(())
}

pub fn output_candidates(
    output_format: OutputFormat,
    raw: &str,
    candidates: &[String],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(candidates)?);
        return Ok(());
    }

    println!("Candidates for '{}': {}", raw, candidates.len());
    for candidate in candidates {
        println!("  {}", candidate);
    }
    Ok(())
}

pub fn output_entries(output_format: OutputFormat, entries: &[WatchlistEntry]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Watchlist is empty.");
        return Ok(());
    }

    println!(
        "{:<38} {:<14} {:<8} {:<12} {:<10} {}",
        "ID", "Plate", "Country", "Color", "Type", "Notes"
    );
    println!("{}", "-".repeat(100));
    for entry in entries {
        println!(
            "{:<38} {:<14} {:<8} {:<12} {:<10} {}",
            entry.id,
            truncate(entry.plate_text().unwrap_or("-"), 14),
            entry.country.code(),
            entry.color.label(),
            entry.vehicle_type.label(),
            entry.notes.as_deref().unwrap_or("")
        );
    }
    println!("\nTotal: {} entries", entries.len());
    Ok(())
}

pub fn output_templates(output_format: OutputFormat, templates: &[Template]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(templates)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("No templates configured.");
        return Ok(());
    }

    for template in templates {
        println!(
            "[{}] {} - {}",
            template.priority, template.display_name, template.pattern
        );
        println!("    {}", template.description);
        println!("    {}", template.matching_pattern);
    }
    Ok(())
}

pub fn output_validation(output_format: OutputFormat, result: &ValidationResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Valid: {}", if result.is_valid { "Yes" } else { "No" });
    for error in &result.errors {
        println!("  error:   {}", error);
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}

pub fn output_save(output_format: OutputFormat, result: &SaveResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result.message);
    }
    Ok(())
}

fn print_entry_detail(entry: &WatchlistEntry) {
    println!("ID:              {}", entry.id);
    println!("Plate:           {}", entry.plate_text().unwrap_or("-"));
    println!("Color:           {}", entry.color.label());
    println!("Type:            {}", entry.vehicle_type.label());
    println!("Added:           {}", entry.added_at.format("%Y-%m-%d %H:%M"));
    if let Some(ref notes) = entry.notes {
        println!("Notes:           {}", notes);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
