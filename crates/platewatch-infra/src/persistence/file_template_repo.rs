//! File-based template repository implementation

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use log::info;

use platewatch_domain::model::Template;
use platewatch_domain::repository::TemplateRepository;
use platewatch_types::{Country, Error, Result};

use super::{load_json_store, lock_poisoned, write_json_atomic};

/// File-based implementation of TemplateRepository
///
/// Templates live in `templates.json`, keyed by country code. Replacing a country's set
/// writes the whole file through a temp file and rename, then swaps the in-memory map while
/// still holding the write lock.
pub struct FileTemplateRepository {
    store_path: PathBuf,
    enabled_countries: Vec<Country>,
    templates: RwLock<HashMap<String, Vec<Template>>>,
}

impl FileTemplateRepository {
    /// Create or load a template repository
    pub fn open(store_dir: PathBuf, enabled_countries: Vec<Country>) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("templates.json");

        let templates = load_json_store(&store_path)?;

        Ok(Self {
            store_path,
            enabled_countries,
            templates: RwLock::new(templates),
        })
    }
}

fn key(country_id: &str) -> String {
    country_id.trim().to_ascii_uppercase()
}

impl TemplateRepository for FileTemplateRepository {
    fn templates_for_country(&self, country_id: &str) -> std::result::Result<Vec<Template>, Error> {
        let templates = self.templates.read().map_err(lock_poisoned)?;
        Ok(templates.get(&key(country_id)).cloned().unwrap_or_default())
    }

    fn replace_templates_for_country(
        &self,
        country_id: &str,
        templates: &[Template],
    ) -> std::result::Result<(), Error> {
        let mut current = self.templates.write().map_err(lock_poisoned)?;
        let mut updated = current.clone();
        if templates.is_empty() {
            updated.remove(&key(country_id));
        } else {
            updated.insert(key(country_id), templates.to_vec());
        }
        write_json_atomic(&self.store_path, &updated)?;
        *current = updated;
        info!("Stored {} template(s) for {}", templates.len(), key(country_id));
        Ok(())
    }

    fn country_enabled(&self, country_id: &str) -> std::result::Result<bool, Error> {
        Ok(Country::from_code(country_id)
            .map(|c| self.enabled_countries.contains(&c))
            .unwrap_or(false))
    }

    fn find_all(&self) -> std::result::Result<Vec<Template>, Error> {
        let templates = self.templates.read().map_err(lock_poisoned)?;
        let mut all: Vec<Template> = templates.values().flatten().cloned().collect();
        all.sort_by(|a, b| {
            a.country_id
                .cmp(&b.country_id)
                .then_with(|| a.priority.cmp(&b.priority))
        });
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open(dir: &std::path::Path) -> FileTemplateRepository {
        FileTemplateRepository::open(
            dir.to_path_buf(),
            vec![Country::Israel, Country::UnitedKingdom],
        )
        .unwrap()
    }

    #[test]
    fn test_replace_overwrites_whole_set() {
        let dir = tempdir().unwrap();
        let repo = open(dir.path());
        repo.replace_templates_for_country(
            "GB",
            &[
                Template::new("GB", "LLNNLLL", "Current", 1),
                Template::new("GB", "LNNNLLL", "Prefix", 2),
            ],
        )
        .unwrap();
        repo.replace_templates_for_country("gb", &[Template::new("GB", "LLLNNN", "Dateless", 1)])
            .unwrap();

        let reopened = open(dir.path());
        let stored = reopened.templates_for_country("GB").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].pattern, "LLLNNN");
    }

    #[test]
    fn test_empty_replace_clears_country() {
        let dir = tempdir().unwrap();
        let repo = open(dir.path());
        repo.replace_templates_for_country("IL", &[Template::new("IL", "NNNNNNN", "Private", 1)])
            .unwrap();
        repo.replace_templates_for_country("IL", &[]).unwrap();
        assert!(repo.templates_for_country("IL").unwrap().is_empty());
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_country_enabled() {
        let dir = tempdir().unwrap();
        let repo = open(dir.path());
        assert!(repo.country_enabled("IL").unwrap());
        assert!(repo.country_enabled("gb").unwrap());
        assert!(!repo.country_enabled("NL").unwrap());
        assert!(!repo.country_enabled("XX").unwrap());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let repo = open(dir.path());
        repo.replace_templates_for_country("IL", &[Template::new("IL", "NNNNNNN", "Private", 1)])
            .unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["templates.json".to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_kept_aside() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("templates.json"), "{\"GB\": [").unwrap();
        let repo = open(dir.path());
        assert!(repo.find_all().unwrap().is_empty());

        repo.replace_templates_for_country("GB", &[Template::new("GB", "LLNNLLL", "Current", 1)])
            .unwrap();
        let kept = fs::read_to_string(dir.path().join("templates.json.corrupt")).unwrap();
        assert_eq!(kept, "{\"GB\": [");
        assert_eq!(repo.templates_for_country("GB").unwrap().len(), 1);
    }
}
