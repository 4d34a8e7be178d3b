//! Member entity - Represents a group member who shares study costs.
//!
//! Members own purchases (1:N) and enroll in subjects through the
//! `member_subjects` join table (M:N).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name of the member
    pub name: String,
    /// Contact email address
    pub email: String,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    /// One member has many subject enrollments
    #[sea_orm(has_many = "super::member_subject::Entity")]
    MemberSubjects,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::member_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
