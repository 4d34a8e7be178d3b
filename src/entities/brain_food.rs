//! Brain food entity - A quantity of one ingredient prepared for one assessment.
//!
//! This is the unit that links ingredients to assessments and, through the
//! `purchase_brain_foods` join table, to member purchases.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Brain food database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brain_foods")]
pub struct Model {
    /// Unique identifier for the brain food entry
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Number of units of the ingredient, at least 1
    pub quantity: i32,
    /// ID of the assessment this entry was prepared for
    pub assessment_id: i32,
    /// ID of the ingredient being consumed
    pub ingredient_id: i32,
}

/// Defines relationships between BrainFood and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each brain food entry belongs to one assessment
    #[sea_orm(
        belongs_to = "super::assessment::Entity",
        from = "Column::AssessmentId",
        to = "super::assessment::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Assessment,
    /// Each brain food entry consumes one ingredient
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Ingredient,
    /// One brain food entry appears in many purchase links
    #[sea_orm(has_many = "super::purchase_brain_food::Entity")]
    PurchaseBrainFoods,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl Related<super::purchase_brain_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseBrainFoods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
