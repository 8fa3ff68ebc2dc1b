//! File-based watchlist repository implementation

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use platewatch_domain::model::WatchlistEntry;
use platewatch_domain::repository::WatchlistRepository;
use platewatch_types::{Country, Error, Result};

use super::{load_json_store, lock_poisoned, write_json_atomic};

/// File-based implementation of WatchlistRepository
///
/// Stores entries keyed by id in `watchlist.json`.
pub struct FileWatchlistRepository {
    store_path: PathBuf,
    entries: RwLock<HashMap<String, WatchlistEntry>>,
}

impl FileWatchlistRepository {
    /// Create or load a watchlist repository
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("watchlist.json");

        let entries = load_json_store(&store_path)?;

        Ok(Self {
            store_path,
            entries: RwLock::new(entries),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Get total entry count
    pub fn count(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

fn sorted(mut entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    entries.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
    entries
}

impl WatchlistRepository for FileWatchlistRepository {
    fn entries_for_country(
        &self,
        country: Country,
    ) -> std::result::Result<Vec<WatchlistEntry>, Error> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(sorted(
            entries
                .values()
                .filter(|e| e.country == country)
                .cloned()
                .collect(),
        ))
    }

    fn save(&self, entry: &WatchlistEntry) -> std::result::Result<(), Error> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        let mut updated = entries.clone();
        updated.insert(entry.id.clone(), entry.clone());
        write_json_atomic(&self.store_path, &updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, id: &str) -> std::result::Result<bool, Error> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        if !entries.contains_key(id) {
            return Ok(false);
        }
        let mut updated = entries.clone();
        updated.remove(id);
        write_json_atomic(&self.store_path, &updated)?;
        *entries = updated;
        Ok(true)
    }

    fn find_all(&self) -> std::result::Result<Vec<WatchlistEntry>, Error> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(sorted(entries.values().cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_types::{VehicleColor, VehicleType};
    use tempfile::tempdir;

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let entry = WatchlistEntry::new(Country::Israel, VehicleColor::Red, VehicleType::Car)
            .with_plate("12-345-67");
        {
            let repo = FileWatchlistRepository::open(dir.path().to_path_buf()).unwrap();
            repo.save(&entry).unwrap();
            assert_eq!(repo.count(), 1);
        }
        let repo = FileWatchlistRepository::open(dir.path().to_path_buf()).unwrap();
        let loaded = repo.entries_for_country(Country::Israel).unwrap();
        assert_eq!(loaded, vec![entry]);
        assert!(repo.entries_for_country(Country::Singapore).unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let repo = FileWatchlistRepository::open(dir.path().to_path_buf()).unwrap();
        let entry = WatchlistEntry::new(Country::Israel, VehicleColor::Red, VehicleType::Car);
        repo.save(&entry).unwrap();
        assert!(repo.remove(&entry.id).unwrap());
        assert!(!repo.remove(&entry.id).unwrap());
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_kept_aside() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("watchlist.json");
        let original = WatchlistEntry::new(Country::Israel, VehicleColor::Red, VehicleType::Car);
        {
            let repo = FileWatchlistRepository::open(dir.path().to_path_buf()).unwrap();
            repo.save(&original).unwrap();
        }
        let mut content = fs::read_to_string(&store).unwrap();
        content.push(',');
        fs::write(&store, &content).unwrap();

        let repo = FileWatchlistRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(repo.count(), 0);
        repo.save(&WatchlistEntry::new(Country::Israel, VehicleColor::Blue, VehicleType::Van))
            .unwrap();

        let kept = fs::read_to_string(dir.path().join("watchlist.json.corrupt")).unwrap();
        assert_eq!(kept, content);
        assert!(kept.contains(&original.id));
        assert_eq!(repo.count(), 1);
    }
}
