//! Domain layer: models, repository traits, and the plate matching services

pub mod model;
pub mod repository;
pub mod service;
