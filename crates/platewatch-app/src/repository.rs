//! Repository adapters for persistence layer

use std::path::PathBuf;

use platewatch_infra::persistence::{FileTemplateRepository, FileWatchlistRepository};
use platewatch_types::Result;

use crate::config::Config;

/// Open file-based watchlist repository
pub fn open_watchlist_repo(config: &Config) -> Result<FileWatchlistRepository> {
    FileWatchlistRepository::open(config.data_dir()?)
}

/// Open file-based template repository
pub fn open_template_repo(config: &Config) -> Result<FileTemplateRepository> {
    FileTemplateRepository::open(config.data_dir()?, config.enabled_countries.clone())
}

/// Open watchlist repository at a custom directory
pub fn open_watchlist_repo_at(data_dir: PathBuf) -> Result<FileWatchlistRepository> {
    FileWatchlistRepository::open(data_dir)
}

/// Open template repository at a custom directory
pub fn open_template_repo_at(
    data_dir: PathBuf,
    config: &Config,
) -> Result<FileTemplateRepository> {
    FileTemplateRepository::open(data_dir, config.enabled_countries.clone())
}
