//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_template_repo;
mod file_watchlist_repo;

pub use file_template_repo::FileTemplateRepository;
pub use file_watchlist_repo::FileWatchlistRepository;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use platewatch_types::{Error, Result};

/// Load a JSON store, or start empty if it does not exist.
///
/// An unreadable store is renamed to `<name>.corrupt` first, so the next write cannot
/// overwrite the only copy of its data.
pub(crate) fn load_json_store<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let reader = BufReader::new(File::open(path)?);
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(value),
        Err(e) => {
            let quarantine = corrupt_path(path);
            fs::rename(path, &quarantine)?;
            warn!(
                "Unreadable store {} moved to {}: {}",
                path.display(),
                quarantine.display(),
                e
            );
            Ok(T::default())
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// Write JSON next to `path` and rename it into place, so the file is never half-written
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

pub(crate) fn lock_poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::Storage("store lock poisoned".to_string())
}
