//! Repository trait definitions for data persistence

use platewatch_types::{Country, Error};

use crate::model::{Template, WatchlistEntry};

/// Repository for watchlist entries
pub trait WatchlistRepository {
    /// Snapshot of all entries registered for a country
    fn entries_for_country(&self, country: Country) -> Result<Vec<WatchlistEntry>, Error>;

    /// Save (insert or overwrite) an entry
    fn save(&self, entry: &WatchlistEntry) -> Result<(), Error>;

    /// Remove an entry by id, returning whether it existed
    fn remove(&self, id: &str) -> Result<bool, Error>;

    /// Find all entries
    fn find_all(&self) -> Result<Vec<WatchlistEntry>, Error>;
}

/// Repository for per-country plate templates
pub trait TemplateRepository {
    /// Templates configured for a country code, in no particular order
    fn templates_for_country(&self, country_id: &str) -> Result<Vec<Template>, Error>;

    /// Replace the country's whole template set in one step.
    ///
    /// Readers must observe either the previous set or the new one.
    fn replace_templates_for_country(
        &self,
        country_id: &str,
        templates: &[Template],
    ) -> Result<(), Error>;

    /// Whether templates may be configured for this country code
    fn country_enabled(&self, country_id: &str) -> Result<bool, Error>;

    /// Find all templates across countries
    fn find_all(&self) -> Result<Vec<Template>, Error>;
}

impl<T: WatchlistRepository + ?Sized> WatchlistRepository for &T {
    fn entries_for_country(&self, country: Country) -> Result<Vec<WatchlistEntry>, Error> {
        (**self).entries_for_country(country)
    }

    fn save(&self, entry: &WatchlistEntry) -> Result<(), Error> {
        (**self).save(entry)
    }

    fn remove(&self, id: &str) -> Result<bool, Error> {
        (**self).remove(id)
    }

    fn find_all(&self) -> Result<Vec<WatchlistEntry>, Error> {
        (**self).find_all()
    }
}

impl<T: TemplateRepository + ?Sized> TemplateRepository for &T {
    fn templates_for_country(&self, country_id: &str) -> Result<Vec<Template>, Error> {
        (**self).templates_for_country(country_id)
    }

    fn replace_templates_for_country(
        &self,
        country_id: &str,
        templates: &[Template],
    ) -> Result<(), Error> {
        (**self).replace_templates_for_country(country_id, templates)
    }

    fn country_enabled(&self, country_id: &str) -> Result<bool, Error> {
        (**self).country_enabled(country_id)
    }

    fn find_all(&self) -> Result<Vec<Template>, Error> {
        (**self).find_all()
    }
}
