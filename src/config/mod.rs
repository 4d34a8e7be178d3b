/// Database configuration and connection management
pub mod database;

/// Ingredient catalog loading from config.toml
pub mod catalog;
