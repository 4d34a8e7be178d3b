//! Shared test utilities for QuizCart.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. Fixture helpers insert
//! rows directly so tests can exercise the service operations independently.

use crate::{entities, errors::Result};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed calendar date for deterministic fixtures; falls back to the epoch
/// date for out-of-range input rather than panicking.
#[must_use]
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Creates a test member with an email derived from the name.
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::member::Model> {
    let member = entities::member::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!(
            "{}@example.com",
            name.to_lowercase().replace(' ', ".")
        )),
        ..Default::default()
    };
    member.insert(db).await.map_err(Into::into)
}

/// Creates a test subject with a default description.
pub async fn create_test_subject(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::subject::Model> {
    let subject = entities::subject::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        ..Default::default()
    };
    subject.insert(db).await.map_err(Into::into)
}

/// Creates a test assessment under the given subject.
///
/// # Defaults
/// * `description`: derived from the title
/// * `date_of_assessment`: 2024-06-01
/// * `difficulty_level`: Medium
pub async fn create_test_assessment(
    db: &DatabaseConnection,
    subject_id: i32,
    title: &str,
) -> Result<entities::assessment::Model> {
    let assessment = entities::assessment::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("{title} description")),
        date_of_assessment: Set(test_date(2024, 6, 1)),
        difficulty_level: Set(entities::assessment::Difficulty::Medium),
        subject_id: Set(subject_id),
        ..Default::default()
    };
    assessment.insert(db).await.map_err(Into::into)
}

/// Creates a test ingredient with the given unit price.
///
/// # Defaults
/// * `benefits`: derived from the name
/// * `image_path`: None
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    unit_price: f64,
) -> Result<entities::ingredient::Model> {
    let ingredient = entities::ingredient::ActiveModel {
        name: Set(name.to_string()),
        benefits: Set(format!("{name} benefits")),
        unit_price: Set(unit_price),
        image_path: Set(None),
        ..Default::default()
    };
    ingredient.insert(db).await.map_err(Into::into)
}

/// Creates a test brain food entry for an assessment/ingredient pair.
pub async fn create_test_brain_food(
    db: &DatabaseConnection,
    assessment_id: i32,
    ingredient_id: i32,
    quantity: i32,
) -> Result<entities::brain_food::Model> {
    let brain_food = entities::brain_food::ActiveModel {
        quantity: Set(quantity),
        assessment_id: Set(assessment_id),
        ingredient_id: Set(ingredient_id),
        ..Default::default()
    };
    brain_food.insert(db).await.map_err(Into::into)
}

/// Creates a test purchase for a member, linked to the given brain food
/// entries, dated 2024-06-05.
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    member_id: i32,
    brain_food_ids: &[i32],
) -> Result<entities::purchase::Model> {
    let purchase = entities::purchase::ActiveModel {
        date_purchased: Set(test_date(2024, 6, 5)),
        member_id: Set(member_id),
        ..Default::default()
    };
    let purchase = purchase.insert(db).await?;

    for &brain_food_id in brain_food_ids {
        let link = entities::purchase_brain_food::ActiveModel {
            purchase_id: Set(purchase.id),
            brain_food_id: Set(brain_food_id),
        };
        link.insert(db).await?;
    }

    Ok(purchase)
}

/// Enrolls a member in a subject by inserting the join row directly.
pub async fn enroll_test_member(
    db: &DatabaseConnection,
    member_id: i32,
    subject_id: i32,
) -> Result<()> {
    let link = entities::member_subject::ActiveModel {
        member_id: Set(member_id),
        subject_id: Set(subject_id),
    };
    link.insert(db).await?;
    Ok(())
}

/// Sets up a complete test environment with one subject and one assessment.
/// Returns (db, subject, assessment) for assessment-related tests.
pub async fn setup_with_assessment() -> Result<(
    DatabaseConnection,
    entities::subject::Model,
    entities::assessment::Model,
)> {
    let db = setup_test_db().await?;
    let subject = create_test_subject(&db, "Mathematics").await?;
    let assessment = create_test_assessment(&db, subject.id, "Midterm Exam").await?;
    Ok((db, subject, assessment))
}
