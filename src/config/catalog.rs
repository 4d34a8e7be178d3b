//! Ingredient catalog loaded from config.toml, used to seed the database.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// The whole config.toml file.
#[derive(Deserialize, Debug)]
pub struct CatalogConfig {
    /// Ingredients to seed on startup
    pub ingredients: Vec<IngredientSeed>,
}

/// One catalog entry.
#[derive(Deserialize, Debug, Clone)]
pub struct IngredientSeed {
    /// Ingredient name, matched against existing rows when seeding
    pub name: String,
    /// Free-form description of study benefits
    pub benefits: String,
    /// Price per unit
    pub unit_price: f64,
    /// Optional path to a catalog image
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Loads the ingredient catalog from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path_ref, e)))?;
    let catalog: CatalogConfig = toml::from_str(&contents).map_err(|e| {
        Error::Config(format!(
            "Failed to parse TOML from config file {:?}: {}",
            path_ref, e
        ))
    })?;
    Ok(catalog)
}

/// Loads the ingredient catalog from the default location (./config.toml).
pub fn load_default_config() -> Result<CatalogConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_ingredient_catalog() {
        let toml_str = r#"
            [[ingredients]]
            name = "Almonds"
            benefits = "Vitamin E for memory"
            unit_price = 1.5
            image_path = "images/almonds.png"

            [[ingredients]]
            name = "Blueberries"
            benefits = "Antioxidants"
            unit_price = 3.25
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ingredients.len(), 2);
        assert_eq!(config.ingredients[0].name, "Almonds");
        assert_eq!(config.ingredients[0].unit_price, 1.5);
        assert_eq!(
            config.ingredients[0].image_path.as_deref(),
            Some("images/almonds.png")
        );

        assert_eq!(config.ingredients[1].name, "Blueberries");
        assert!(config.ingredients[1].image_path.is_none());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("does-not-exist.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
