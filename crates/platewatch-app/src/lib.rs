//! Application layer: use cases over the domain services and file repositories

pub mod app;
pub mod config;
pub mod repository;
