//! Subject business logic - Enrollment counts and the subject lifecycle.
//!
//! Deleting a subject tears down its whole subtree: assessments, their brain
//! food entries, the purchase links on those entries, and the member
//! enrollments pointing at the subject.

use crate::{
    entities::{
        Assessment, BrainFood, Member, MemberSubject, PurchaseBrainFood, Subject, assessment,
        brain_food, member_subject, purchase_brain_food, subject,
    },
    errors::Result,
    models::{ServiceResponse, SubjectSummary, SubjectUpdate},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Per-subject assessment and enrollment counts.
#[derive(Debug, Clone, Default)]
pub struct SubjectStats {
    /// Assessment counts keyed by subject id
    pub assessments_per_subject: HashMap<i32, usize>,
    /// Enrolled member counts keyed by subject id
    pub members_per_subject: HashMap<i32, usize>,
}

/// Counts assessments and enrolled members for every subject.
pub async fn load_subject_stats(db: &DatabaseConnection) -> Result<SubjectStats> {
    let mut stats = SubjectStats::default();

    for assessment in Assessment::find().all(db).await? {
        *stats
            .assessments_per_subject
            .entry(assessment.subject_id)
            .or_insert(0) += 1;
    }

    for link in MemberSubject::find().all(db).await? {
        *stats.members_per_subject.entry(link.subject_id).or_insert(0) += 1;
    }

    Ok(stats)
}

/// Builds the display summary for one subject from the preloaded counts.
#[must_use]
pub fn summarize_subject(subject: &subject::Model, stats: &SubjectStats) -> SubjectSummary {
    SubjectSummary {
        subject_id: subject.id,
        name: subject.name.clone(),
        description: subject.description.clone(),
        total_assessments: stats
            .assessments_per_subject
            .get(&subject.id)
            .copied()
            .unwrap_or(0),
        total_members: stats
            .members_per_subject
            .get(&subject.id)
            .copied()
            .unwrap_or(0),
    }
}

/// Retrieves all subjects with their counts, ordered by id.
pub async fn get_all_subjects(db: &DatabaseConnection) -> Result<Vec<SubjectSummary>> {
    let subjects = Subject::find()
        .order_by_asc(subject::Column::Id)
        .all(db)
        .await?;
    let stats = load_subject_stats(db).await?;
    Ok(subjects.iter().map(|s| summarize_subject(s, &stats)).collect())
}

/// Finds a single subject by its id, returning None if absent.
pub async fn find_subject(db: &DatabaseConnection, id: i32) -> Result<Option<SubjectSummary>> {
    let subject = match Subject::find_by_id(id).one(db).await? {
        Some(subject) => subject,
        None => return Ok(None),
    };
    let stats = load_subject_stats(db).await?;
    Ok(Some(summarize_subject(&subject, &stats)))
}

/// Retrieves the subjects a member is enrolled in, ordered by id.
///
/// An unknown member yields an empty list.
pub async fn get_subjects_by_member(
    db: &DatabaseConnection,
    member_id: i32,
) -> Result<Vec<SubjectSummary>> {
    if Member::find_by_id(member_id).one(db).await?.is_none() {
        return Ok(Vec::new());
    }

    let subject_ids: Vec<i32> = MemberSubject::find()
        .filter(member_subject::Column::MemberId.eq(member_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.subject_id)
        .collect();
    if subject_ids.is_empty() {
        return Ok(Vec::new());
    }

    let subjects = Subject::find()
        .filter(subject::Column::Id.is_in(subject_ids))
        .order_by_asc(subject::Column::Id)
        .all(db)
        .await?;
    let stats = load_subject_stats(db).await?;
    Ok(subjects.iter().map(|s| summarize_subject(s, &stats)).collect())
}

/// Creates a new subject.
pub async fn add_subject(
    db: &DatabaseConnection,
    name: String,
    description: String,
) -> Result<ServiceResponse> {
    let subject = subject::ActiveModel {
        name: Set(name),
        description: Set(description),
        ..Default::default()
    };

    match subject.insert(db).await {
        Ok(model) => Ok(ServiceResponse::created(model.id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding subject.",
            e.to_string(),
        )),
    }
}

/// Replaces a subject's name and description.
///
/// The path id must match `update.subject_id` or the call is refused.
pub async fn update_subject(
    db: &DatabaseConnection,
    id: i32,
    update: &SubjectUpdate,
) -> Result<ServiceResponse> {
    if id != update.subject_id {
        return Ok(ServiceResponse::error("Subject ID mismatch."));
    }

    let subject = match Subject::find_by_id(id).one(db).await? {
        Some(subject) => subject,
        None => return Ok(ServiceResponse::not_found("Subject not found.")),
    };

    let mut active: subject::ActiveModel = subject.into();
    active.name = Set(update.name.clone());
    active.description = Set(update.description.clone());

    match active.update(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating subject.",
            e.to_string(),
        )),
    }
}

/// Deletes a subject together with its assessments, their brain food entries
/// and purchase links, and all enrollments in the subject.
pub async fn delete_subject(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let subject = match Subject::find_by_id(id).one(db).await? {
        Some(subject) => subject,
        None => return Ok(ServiceResponse::not_found("Subject not found.")),
    };

    match delete_subject_graph(db, subject.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error deleting subject.",
            e.to_string(),
        )),
    }
}

/// Removes a subject and its dependent rows in one transaction.
async fn delete_subject_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let assessment_ids: Vec<i32> = Assessment::find()
        .filter(assessment::Column::SubjectId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();
    let assessment_count = assessment_ids.len();

    if !assessment_ids.is_empty() {
        let brain_food_ids: Vec<i32> = BrainFood::find()
            .filter(brain_food::Column::AssessmentId.is_in(assessment_ids.clone()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|bf| bf.id)
            .collect();

        if !brain_food_ids.is_empty() {
            PurchaseBrainFood::delete_many()
                .filter(purchase_brain_food::Column::BrainFoodId.is_in(brain_food_ids))
                .exec(&txn)
                .await?;
            BrainFood::delete_many()
                .filter(brain_food::Column::AssessmentId.is_in(assessment_ids.clone()))
                .exec(&txn)
                .await?;
        }

        Assessment::delete_many()
            .filter(assessment::Column::Id.is_in(assessment_ids))
            .exec(&txn)
            .await?;
    }

    MemberSubject::delete_many()
        .filter(member_subject::Column::SubjectId.eq(id))
        .exec(&txn)
        .await?;
    Subject::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!("Deleted subject {} with {} assessments", id, assessment_count);
    Ok(())
}
