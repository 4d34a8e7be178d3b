//! Ingredient entity - A purchasable food item with a unit price.
//!
//! Ingredients appear in brain food entries, which tie a quantity of the
//! ingredient to a specific assessment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    /// Unique identifier for the ingredient
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Name of the ingredient (e.g., "Almonds")
    pub name: String,
    /// Free-text description of cognitive benefits
    pub benefits: String,
    /// Price per unit in dollars, non-negative
    pub unit_price: f64,
    /// Optional path to a catalog image, None when no image was provided
    pub image_path: Option<String>,
}

/// Defines relationships between Ingredient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One ingredient appears in many brain food entries
    #[sea_orm(has_many = "super::brain_food::Entity")]
    BrainFoods,
}

impl Related<super::brain_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BrainFoods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
