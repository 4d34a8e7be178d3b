//! MemberSubject entity - Join table linking members to their subjects.
//!
//! One row per enrollment. Link/unlink operations insert and delete rows
//! here without touching the member or subject themselves.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member-subject enrollment model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member_subjects")]
pub struct Model {
    /// Member half of the composite primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i32,
    /// Subject half of the composite primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: i32,
}

/// Defines relationships between MemberSubject and the joined entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each enrollment belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Member,
    /// Each enrollment belongs to one subject
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Subject,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
