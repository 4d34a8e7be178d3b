//! Subject entity - A course of study that members enroll in.
//!
//! Subjects own assessments (1:N) and are linked to members through the
//! `member_subjects` join table (M:N).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subject database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    /// Unique identifier for the subject
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Name of the subject (e.g., "Mathematics")
    pub name: String,
    /// Free-text description of the subject
    pub description: String,
}

/// Defines relationships between Subject and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One subject has many assessments
    #[sea_orm(has_many = "super::assessment::Entity")]
    Assessments,
    /// One subject has many member enrollments
    #[sea_orm(has_many = "super::member_subject::Entity")]
    MemberSubjects,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl Related<super::member_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
