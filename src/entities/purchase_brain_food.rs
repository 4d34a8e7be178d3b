//! PurchaseBrainFood entity - Join table linking purchases to brain food entries.
//!
//! One row per covered entry. Unlinking removes the row; the brain food
//! entry itself survives and may be referenced by other purchases.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase-brain-food link model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_brain_foods")]
pub struct Model {
    /// Purchase half of the composite primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub purchase_id: i32,
    /// Brain food half of the composite primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub brain_food_id: i32,
}

/// Defines relationships between PurchaseBrainFood and the joined entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Purchase,
    /// Each link belongs to one brain food entry
    #[sea_orm(
        belongs_to = "super::brain_food::Entity",
        from = "Column::BrainFoodId",
        to = "super::brain_food::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    BrainFood,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl Related<super::brain_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BrainFood.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
