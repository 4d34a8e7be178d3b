//! Assessment entity - A dated test or exam belonging to one subject.
//!
//! Each assessment carries a difficulty level and owns the brain food
//! entries (ingredient quantities) prepared for it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Difficulty rating of an assessment, stored as an integer column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Difficulty {
    /// Introductory material
    #[sea_orm(num_value = 0)]
    Easy,
    /// Standard coursework
    #[sea_orm(num_value = 1)]
    Medium,
    /// Advanced material
    #[sea_orm(num_value = 2)]
    Hard,
}

/// Assessment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    /// Unique identifier for the assessment
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Title of the assessment (e.g., "Midterm Exam")
    pub title: String,
    /// Free-text description of what the assessment covers
    pub description: String,
    /// Calendar date the assessment takes place
    pub date_of_assessment: Date,
    /// Difficulty rating
    pub difficulty_level: Difficulty,
    /// ID of the subject this assessment belongs to
    pub subject_id: i32,
}

/// Defines relationships between Assessment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assessment belongs to one subject
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Subject,
    /// One assessment has many brain food entries
    #[sea_orm(has_many = "super::brain_food::Entity")]
    BrainFoods,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::brain_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BrainFoods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
