//! Platewatch - watchlist matching for license plate detections
//!
//! A CLI tool that decides whether OCR'd plate detections match a vehicle watchlist.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
