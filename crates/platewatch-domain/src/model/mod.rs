//! Domain model types

pub mod detected_vehicle;
pub mod template;
pub mod watchlist_entry;

pub use detected_vehicle::DetectedVehicle;
pub use template::Template;
pub use watchlist_entry::WatchlistEntry;
