//! File-backed implementations of the domain repositories

pub mod persistence;
pub mod watchlist_import;
