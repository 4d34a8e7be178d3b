//! Purchase entity - A dated shopping transaction made by one member.
//!
//! The brain food entries covered by a purchase are recorded in the
//! `purchase_brain_foods` join table (M:N).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Calendar date the purchase was made
    pub date_purchased: Date,
    /// ID of the member who paid
    pub member_id: i32,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Member,
    /// One purchase covers many brain food links
    #[sea_orm(has_many = "super::purchase_brain_food::Entity")]
    PurchaseBrainFoods,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::purchase_brain_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseBrainFoods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
