//! Assessment business logic - Reading assessments with their study context
//! and managing their lifecycle.
//!
//! An assessment summary carries the parent subject's name, the names of the
//! members enrolled in that subject, and the full brain food list for the
//! assessment. Deleting an assessment removes its brain food entries and any
//! purchase links on them.

use crate::{
    core::brain_food::{load_brain_food_context, summarize_brain_food},
    entities::{
        Assessment, BrainFood, Member, MemberSubject, PurchaseBrainFood, Subject, assessment,
        assessment::Difficulty, brain_food, purchase_brain_food,
    },
    errors::Result,
    models::{AssessmentSummary, AssessmentUpdate, BrainFoodSummary, PaginatedResult, ServiceResponse},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Lookup tables for turning assessment rows into summaries.
#[derive(Debug, Clone, Default)]
pub struct AssessmentContext {
    /// Subject names keyed by subject id
    pub subject_names: HashMap<i32, String>,
    /// Enrolled member names keyed by subject id
    pub members_by_subject: HashMap<i32, Vec<String>>,
    /// Brain food summaries keyed by assessment id
    pub brain_foods_by_assessment: HashMap<i32, Vec<BrainFoodSummary>>,
}

/// Loads subjects, enrollments, and brain food entries for summarizing.
pub async fn load_assessment_context(db: &DatabaseConnection) -> Result<AssessmentContext> {
    let mut ctx = AssessmentContext::default();

    for subject in Subject::find().all(db).await? {
        ctx.subject_names.insert(subject.id, subject.name);
    }

    let member_names: HashMap<i32, String> = Member::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    for link in MemberSubject::find().all(db).await? {
        let name = match member_names.get(&link.member_id) {
            Some(name) => name.clone(),
            None => continue,
        };
        ctx.members_by_subject
            .entry(link.subject_id)
            .or_default()
            .push(name);
    }

    let brain_food_ctx = load_brain_food_context(db).await?;
    for entry in BrainFood::find().all(db).await? {
        let summary = summarize_brain_food(&entry, &brain_food_ctx);
        ctx.brain_foods_by_assessment
            .entry(entry.assessment_id)
            .or_default()
            .push(summary);
    }

    Ok(ctx)
}

/// Builds the display summary for one assessment from the preloaded context.
#[must_use]
pub fn summarize_assessment(
    assessment: &assessment::Model,
    ctx: &AssessmentContext,
) -> AssessmentSummary {
    AssessmentSummary {
        assessment_id: assessment.id,
        title: assessment.title.clone(),
        description: assessment.description.clone(),
        date_of_assessment: assessment.date_of_assessment,
        difficulty_level: assessment.difficulty_level,
        subject_name: ctx
            .subject_names
            .get(&assessment.subject_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        member_names: ctx
            .members_by_subject
            .get(&assessment.subject_id)
            .cloned()
            .unwrap_or_default(),
        brain_foods: ctx
            .brain_foods_by_assessment
            .get(&assessment.id)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Retrieves all assessments with their study context, ordered by id.
pub async fn get_all_assessments(db: &DatabaseConnection) -> Result<Vec<AssessmentSummary>> {
    let assessments = Assessment::find()
        .order_by_asc(assessment::Column::Id)
        .all(db)
        .await?;
    let ctx = load_assessment_context(db).await?;
    Ok(assessments
        .iter()
        .map(|a| summarize_assessment(a, &ctx))
        .collect())
}

/// Finds a single assessment by its id, returning None if absent.
pub async fn find_assessment(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<AssessmentSummary>> {
    let assessment = match Assessment::find_by_id(id).one(db).await? {
        Some(assessment) => assessment,
        None => return Ok(None),
    };
    let ctx = load_assessment_context(db).await?;
    Ok(Some(summarize_assessment(&assessment, &ctx)))
}

/// Retrieves every assessment belonging to one subject, ordered by id.
pub async fn get_assessments_by_subject(
    db: &DatabaseConnection,
    subject_id: i32,
) -> Result<Vec<AssessmentSummary>> {
    let assessments = Assessment::find()
        .filter(assessment::Column::SubjectId.eq(subject_id))
        .order_by_asc(assessment::Column::Id)
        .all(db)
        .await?;
    if assessments.is_empty() {
        return Ok(Vec::new());
    }
    let ctx = load_assessment_context(db).await?;
    Ok(assessments
        .iter()
        .map(|a| summarize_assessment(a, &ctx))
        .collect())
}

/// Retrieves one page of assessments ordered by date, earliest first.
///
/// Page numbers are 1-based; zero values for either argument are clamped to 1.
pub async fn get_paginated_assessments(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
) -> Result<PaginatedResult<AssessmentSummary>> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let assessments = Assessment::find()
        .order_by_asc(assessment::Column::DateOfAssessment)
        .all(db)
        .await?;
    let total_count = assessments.len() as u64;

    let ctx = load_assessment_context(db).await?;

    let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let items = assessments
        .iter()
        .skip(offset)
        .take(take)
        .map(|a| summarize_assessment(a, &ctx))
        .collect();

    Ok(PaginatedResult {
        items,
        total_count,
        page,
        page_size,
    })
}

/// Creates a new assessment under a subject.
///
/// An unknown `subject_id` is rejected by the database and reported in the
/// response envelope.
pub async fn add_assessment(
    db: &DatabaseConnection,
    title: String,
    description: String,
    date_of_assessment: NaiveDate,
    difficulty_level: Difficulty,
    subject_id: i32,
) -> Result<ServiceResponse> {
    let assessment = assessment::ActiveModel {
        title: Set(title),
        description: Set(description),
        date_of_assessment: Set(date_of_assessment),
        difficulty_level: Set(difficulty_level),
        subject_id: Set(subject_id),
        ..Default::default()
    };

    match assessment.insert(db).await {
        Ok(model) => Ok(ServiceResponse::created(model.id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding assessment.",
            e.to_string(),
        )),
    }
}

/// Replaces an assessment's title, description, date, and difficulty.
///
/// The parent subject is never changed by an update.
pub async fn update_assessment(
    db: &DatabaseConnection,
    id: i32,
    update: &AssessmentUpdate,
) -> Result<ServiceResponse> {
    if id != update.assessment_id {
        return Ok(ServiceResponse::error("Assessment ID mismatch."));
    }

    let assessment = match Assessment::find_by_id(id).one(db).await? {
        Some(assessment) => assessment,
        None => return Ok(ServiceResponse::not_found("Assessment not found.")),
    };

    let mut active: assessment::ActiveModel = assessment.into();
    active.title = Set(update.title.clone());
    active.description = Set(update.description.clone());
    active.date_of_assessment = Set(update.date_of_assessment);
    active.difficulty_level = Set(update.difficulty_level);

    match active.update(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating assessment.",
            e.to_string(),
        )),
    }
}

/// Deletes an assessment, its brain food entries, and their purchase links.
pub async fn delete_assessment(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let assessment = match Assessment::find_by_id(id).one(db).await? {
        Some(assessment) => assessment,
        None => return Ok(ServiceResponse::not_found("Assessment not found.")),
    };

    match delete_assessment_graph(db, assessment.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error deleting assessment.",
            e.to_string(),
        )),
    }
}

/// Removes an assessment and its dependent rows in one transaction.
async fn delete_assessment_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let brain_food_ids: Vec<i32> = BrainFood::find()
        .filter(brain_food::Column::AssessmentId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|bf| bf.id)
        .collect();
    let brain_food_count = brain_food_ids.len();

    if !brain_food_ids.is_empty() {
        PurchaseBrainFood::delete_many()
            .filter(purchase_brain_food::Column::BrainFoodId.is_in(brain_food_ids))
            .exec(&txn)
            .await?;
        BrainFood::delete_many()
            .filter(brain_food::Column::AssessmentId.eq(id))
            .exec(&txn)
            .await?;
    }

    Assessment::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Deleted assessment {} with {} brain food entries",
        id,
        brain_food_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::ServiceStatus;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_assessment_summary_includes_study_context() -> Result<()> {
        let (db, subject, assessment) = setup_with_assessment().await?;
        let alice = create_test_member(&db, "Alice").await?;
        let bob = create_test_member(&db, "Bob").await?;
        enroll_test_member(&db, alice.id, subject.id).await?;
        enroll_test_member(&db, bob.id, subject.id).await?;
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;
        create_test_brain_food(&db, assessment.id, almond.id, 3).await?;

        let summary = find_assessment(&db, assessment.id).await?.unwrap();
        assert_eq!(summary.title, "Midterm Exam");
        assert_eq!(summary.subject_name, "Mathematics");
        assert_eq!(summary.member_names, vec!["Alice", "Bob"]);
        assert_eq!(summary.brain_foods.len(), 1);
        assert_eq!(summary.brain_foods[0].ingredient_name, "Almond");
        assert_eq!(summary.brain_foods[0].quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_assessment_missing() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(find_assessment(&db, 404).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_assessment() -> Result<()> {
        let db = setup_test_db().await?;
        let subject = create_test_subject(&db, "Physics").await?;

        let response = add_assessment(
            &db,
            "Lab Practical".to_string(),
            "Circuits lab".to_string(),
            test_date(2024, 9, 12),
            Difficulty::Hard,
            subject.id,
        )
        .await?;
        assert_eq!(response.status, ServiceStatus::Created);

        let summary = find_assessment(&db, response.created_id.unwrap()).await?.unwrap();
        assert_eq!(summary.title, "Lab Practical");
        assert_eq!(summary.date_of_assessment, test_date(2024, 9, 12));
        assert_eq!(summary.difficulty_level, Difficulty::Hard);
        assert_eq!(summary.subject_name, "Physics");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_assessment_unknown_subject_is_error() -> Result<()> {
        let db = setup_test_db().await?;

        let response = add_assessment(
            &db,
            "Orphan Quiz".to_string(),
            "No subject".to_string(),
            test_date(2024, 9, 12),
            Difficulty::Easy,
            999,
        )
        .await?;
        assert_eq!(response.status, ServiceStatus::Error);
        assert_eq!(response.messages[0], "Error adding assessment.");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_assessment_id_mismatch() -> Result<()> {
        let db = setup_test_db().await?;

        let update = AssessmentUpdate {
            assessment_id: 5,
            title: "Quiz".to_string(),
            description: "Short quiz".to_string(),
            date_of_assessment: test_date(2024, 7, 1),
            difficulty_level: Difficulty::Easy,
        };
        let response = update_assessment(&db, 4, &update).await?;
        assert_eq!(response.status, ServiceStatus::Error);
        assert_eq!(response.messages, vec!["Assessment ID mismatch."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_assessment_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let update = AssessmentUpdate {
            assessment_id: 4,
            title: "Quiz".to_string(),
            description: "Short quiz".to_string(),
            date_of_assessment: test_date(2024, 7, 1),
            difficulty_level: Difficulty::Easy,
        };
        let response = update_assessment(&db, 4, &update).await?;
        assert_eq!(response.status, ServiceStatus::NotFound);
        assert_eq!(response.messages, vec!["Assessment not found."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_assessment_keeps_subject() -> Result<()> {
        let (db, _subject, assessment) = setup_with_assessment().await?;

        let update = AssessmentUpdate {
            assessment_id: assessment.id,
            title: "Midterm Exam (rescheduled)".to_string(),
            description: "Moved a week out".to_string(),
            date_of_assessment: test_date(2024, 6, 8),
            difficulty_level: Difficulty::Hard,
        };
        let response = update_assessment(&db, assessment.id, &update).await?;
        assert_eq!(response.status, ServiceStatus::Updated);

        let summary = find_assessment(&db, assessment.id).await?.unwrap();
        assert_eq!(summary.title, "Midterm Exam (rescheduled)");
        assert_eq!(summary.date_of_assessment, test_date(2024, 6, 8));
        assert_eq!(summary.difficulty_level, Difficulty::Hard);
        assert_eq!(summary.subject_name, "Mathematics");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_assessment_cascades_brain_foods() -> Result<()> {
        let (db, _subject, assessment) = setup_with_assessment().await?;
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;
        let salmon = create_test_ingredient(&db, "Salmon", 6.25).await?;
        let first = create_test_brain_food(&db, assessment.id, almond.id, 2).await?;
        let second = create_test_brain_food(&db, assessment.id, salmon.id, 1).await?;
        let member = create_test_member(&db, "Alice").await?;
        let purchase = create_test_purchase(&db, member.id, &[first.id, second.id]).await?;

        let response = delete_assessment(&db, assessment.id).await?;
        assert_eq!(response.status, ServiceStatus::Deleted);

        assert!(Assessment::find_by_id(assessment.id).one(&db).await?.is_none());
        assert!(BrainFood::find_by_id(first.id).one(&db).await?.is_none());
        assert!(BrainFood::find_by_id(second.id).one(&db).await?.is_none());
        assert!(
            PurchaseBrainFood::find()
                .filter(purchase_brain_food::Column::PurchaseId.eq(purchase.id))
                .all(&db)
                .await?
                .is_empty()
        );
        // The purchase record and the ingredients survive.
        assert!(
            crate::entities::Purchase::find_by_id(purchase.id)
                .one(&db)
                .await?
                .is_some()
        );
        assert!(
            crate::entities::Ingredient::find_by_id(almond.id)
                .one(&db)
                .await?
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_assessment_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let response = delete_assessment(&db, 31).await?;
        assert_eq!(response.status, ServiceStatus::NotFound);
        assert_eq!(response.messages, vec!["Assessment not found."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_assessments_by_subject() -> Result<()> {
        let db = setup_test_db().await?;
        let math = create_test_subject(&db, "Mathematics").await?;
        let biology = create_test_subject(&db, "Biology").await?;
        create_test_assessment(&db, math.id, "Midterm Exam").await?;
        create_test_assessment(&db, biology.id, "Dissection Lab").await?;

        let math_only = get_assessments_by_subject(&db, math.id).await?;
        assert_eq!(math_only.len(), 1);
        assert_eq!(math_only[0].title, "Midterm Exam");

        assert!(get_assessments_by_subject(&db, 999).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_paginated_assessments_order_by_date() -> Result<()> {
        let db = setup_test_db().await?;
        let subject = create_test_subject(&db, "History").await?;
        for (title, date) in [
            ("Essay", test_date(2024, 9, 20)),
            ("Quiz", test_date(2024, 9, 1)),
            ("Final", test_date(2024, 12, 15)),
        ] {
            add_assessment(
                &db,
                title.to_string(),
                String::new(),
                date,
                Difficulty::Medium,
                subject.id,
            )
            .await?;
        }

        let first_page = get_paginated_assessments(&db, 1, 2).await?;
        assert_eq!(first_page.total_count, 3);
        let titles: Vec<&str> = first_page.items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Quiz", "Essay"]);

        let second_page = get_paginated_assessments(&db, 2, 2).await?;
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].title, "Final");

        // A page past the end is empty but still reports the true total.
        let past_end = get_paginated_assessments(&db, 9, 2).await?;
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_count, 3);

        // Page zero is treated as the first page.
        let clamped = get_paginated_assessments(&db, 0, 2).await?;
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items.len(), 2);

        Ok(())
    }
}
