//! Ingredient business logic - Catalog reads, lifecycle, and startup seeding.
//!
//! An ingredient summary lists every brain food entry using the ingredient
//! and counts the distinct assessments those entries belong to. Deleting an
//! ingredient removes its brain food entries and any purchase links on them.

use crate::{
    config::catalog::CatalogConfig,
    core::brain_food::{BrainFoodContext, load_brain_food_context, summarize_brain_food},
    entities::{
        BrainFood, Ingredient, PurchaseBrainFood, brain_food, ingredient, purchase_brain_food,
    },
    errors::Result,
    models::{IngredientSummary, IngredientUpdate, ServiceResponse},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{HashMap, HashSet};

/// Builds the display summary for one ingredient from its brain food entries.
#[must_use]
pub fn summarize_ingredient(
    ingredient: &ingredient::Model,
    entries: &[brain_food::Model],
    ctx: &BrainFoodContext,
) -> IngredientSummary {
    let distinct_assessments: HashSet<i32> = entries.iter().map(|e| e.assessment_id).collect();

    IngredientSummary {
        ingredient_id: ingredient.id,
        name: ingredient.name.clone(),
        benefits: ingredient.benefits.clone(),
        unit_price: ingredient.unit_price,
        image_path: ingredient.image_path.clone(),
        total_assessments: distinct_assessments.len(),
        assessments_used_in: entries.iter().map(|e| summarize_brain_food(e, ctx)).collect(),
    }
}

/// Retrieves all ingredients with their usage, ordered by id.
pub async fn get_all_ingredients(db: &DatabaseConnection) -> Result<Vec<IngredientSummary>> {
    let ingredients = Ingredient::find()
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?;
    if ingredients.is_empty() {
        return Ok(Vec::new());
    }

    let ctx = load_brain_food_context(db).await?;
    let mut entries_by_ingredient: HashMap<i32, Vec<brain_food::Model>> = HashMap::new();
    for entry in BrainFood::find().all(db).await? {
        entries_by_ingredient
            .entry(entry.ingredient_id)
            .or_default()
            .push(entry);
    }

    let empty = Vec::new();
    Ok(ingredients
        .iter()
        .map(|ing| {
            let entries = entries_by_ingredient.get(&ing.id).unwrap_or(&empty);
            summarize_ingredient(ing, entries, &ctx)
        })
        .collect())
}

/// Finds a single ingredient by its id, returning None if absent.
pub async fn find_ingredient(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<IngredientSummary>> {
    let ingredient = match Ingredient::find_by_id(id).one(db).await? {
        Some(ingredient) => ingredient,
        None => return Ok(None),
    };

    let entries = BrainFood::find()
        .filter(brain_food::Column::IngredientId.eq(id))
        .all(db)
        .await?;
    let ctx = load_brain_food_context(db).await?;
    Ok(Some(summarize_ingredient(&ingredient, &entries, &ctx)))
}

/// Creates a new ingredient.
///
/// The unit price must be a finite, non-negative number.
pub async fn add_ingredient(
    db: &DatabaseConnection,
    name: String,
    benefits: String,
    unit_price: f64,
    image_path: Option<String>,
) -> Result<ServiceResponse> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Ok(ServiceResponse::error_with(
            "Error adding ingredient.",
            "Unit price must be a non-negative number.",
        ));
    }

    let ingredient = ingredient::ActiveModel {
        name: Set(name),
        benefits: Set(benefits),
        unit_price: Set(unit_price),
        image_path: Set(image_path),
        ..Default::default()
    };

    match ingredient.insert(db).await {
        Ok(model) => Ok(ServiceResponse::created(model.id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding ingredient.",
            e.to_string(),
        )),
    }
}

/// Replaces an ingredient's name, benefits, unit price, and image path.
pub async fn update_ingredient(
    db: &DatabaseConnection,
    id: i32,
    update: &IngredientUpdate,
) -> Result<ServiceResponse> {
    if id != update.ingredient_id {
        return Ok(ServiceResponse::error("Ingredient ID mismatch."));
    }

    let ingredient = match Ingredient::find_by_id(id).one(db).await? {
        Some(ingredient) => ingredient,
        None => return Ok(ServiceResponse::not_found("Ingredient not found.")),
    };

    let mut active: ingredient::ActiveModel = ingredient.into();
    active.name = Set(update.name.clone());
    active.benefits = Set(update.benefits.clone());
    active.unit_price = Set(update.unit_price);
    active.image_path = Set(update.image_path.clone());

    match active.update(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating ingredient.",
            e.to_string(),
        )),
    }
}

/// Deletes an ingredient, its brain food entries, and their purchase links.
pub async fn delete_ingredient(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let ingredient = match Ingredient::find_by_id(id).one(db).await? {
        Some(ingredient) => ingredient,
        None => return Ok(ServiceResponse::not_found("Ingredient not found.")),
    };

    match delete_ingredient_graph(db, ingredient.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error deleting ingredient.",
            e.to_string(),
        )),
    }
}

/// Removes an ingredient and its dependent rows in one transaction.
async fn delete_ingredient_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let brain_food_ids: Vec<i32> = BrainFood::find()
        .filter(brain_food::Column::IngredientId.eq(id))
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
            .filter(brain_food::Column::IngredientId.eq(id))
            .exec(&txn)
            .await?;
    }

    Ingredient::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Deleted ingredient {} with {} brain food entries",
        id,
        brain_food_count
    );
    Ok(())
}

/// Inserts catalog ingredients that are not already present by name.
///
/// Returns the number of rows inserted. Catalog rows with an invalid unit
/// price are skipped with a warning instead of aborting the seed.
pub async fn seed_ingredients(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<usize> {
    let existing: HashSet<String> = Ingredient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| i.name)
        .collect();

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for seed in &catalog.ingredients {
        if !seed.unit_price.is_finite() || seed.unit_price < 0.0 {
            tracing::warn!(
                "Skipping catalog ingredient '{}': invalid unit price {}",
                seed.name,
                seed.unit_price
            );
            skipped += 1;
            continue;
        }
        if existing.contains(&seed.name) {
            tracing::debug!("Catalog ingredient '{}' already present", seed.name);
            skipped += 1;
            continue;
        }

        let row = ingredient::ActiveModel {
            name: Set(seed.name.clone()),
            benefits: Set(seed.benefits.clone()),
            unit_price: Set(seed.unit_price),
            image_path: Set(seed.image_path.clone()),
            ..Default::default()
        };
        row.insert(db).await?;
        inserted += 1;
    }

    tracing::info!(
        "Ingredient catalog seeded: {} inserted, {} skipped",
        inserted,
        skipped
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::ServiceStatus;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_ingredient_usage_counts_distinct_assessments() -> Result<()> {
        let (db, _subject, midterm) = setup_with_assessment().await?;
        let final_exam = {
            let subject = create_test_subject(&db, "Biology").await?;
            create_test_assessment(&db, subject.id, "Final Exam").await?
        };
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;
        create_test_brain_food(&db, midterm.id, almond.id, 3).await?;
        create_test_brain_food(&db, midterm.id, almond.id, 1).await?;
        create_test_brain_food(&db, final_exam.id, almond.id, 2).await?;

        let summary = find_ingredient(&db, almond.id).await?.unwrap();
        assert_eq!(summary.name, "Almond");
        assert_eq!(summary.unit_price, 1.50);
        // Three entries, but only two distinct assessments.
        assert_eq!(summary.assessments_used_in.len(), 3);
        assert_eq!(summary.total_assessments, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_ingredient_entries_carry_price_and_quantity() -> Result<()> {
        let (db, _subject, assessment) = setup_with_assessment().await?;
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;
        create_test_brain_food(&db, assessment.id, almond.id, 3).await?;

        let summary = find_ingredient(&db, almond.id).await?.unwrap();
        assert_eq!(summary.assessments_used_in.len(), 1);
        let entry = &summary.assessments_used_in[0];
        assert_eq!(entry.quantity, 3);
        assert_eq!(entry.unit_price, 1.50);
        assert_eq!(entry.assessment_name, "Midterm Exam");

        Ok(())
    }

    #[tokio::test]
    async fn test_find_ingredient_missing() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(find_ingredient(&db, 50).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_ingredient() -> Result<()> {
        let db = setup_test_db().await?;

        let response = add_ingredient(
            &db,
            "Walnut".to_string(),
            "Omega-3 fatty acids".to_string(),
            2.75,
            Some("images/walnut.png".to_string()),
        )
        .await?;
        assert_eq!(response.status, ServiceStatus::Created);

        let summary = find_ingredient(&db, response.created_id.unwrap()).await?.unwrap();
        assert_eq!(summary.name, "Walnut");
        assert_eq!(summary.unit_price, 2.75);
        assert_eq!(summary.image_path.as_deref(), Some("images/walnut.png"));
        assert_eq!(summary.total_assessments, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_ingredient_negative_price_is_error() -> Result<()> {
        let db = setup_test_db().await?;

        let response = add_ingredient(
            &db,
            "Walnut".to_string(),
            "Omega-3 fatty acids".to_string(),
            -0.50,
            None,
        )
        .await?;
        assert_eq!(response.status, ServiceStatus::Error);
        assert_eq!(
            response.messages,
            vec![
                "Error adding ingredient.",
                "Unit price must be a non-negative number."
            ]
        );
        assert!(get_all_ingredients(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ingredient_id_mismatch() -> Result<()> {
        let db = setup_test_db().await?;

        let update = IngredientUpdate {
            ingredient_id: 8,
            name: "Walnut".to_string(),
            benefits: "Omega-3".to_string(),
            unit_price: 2.75,
            image_path: None,
        };
        let response = update_ingredient(&db, 7, &update).await?;
        assert_eq!(response.status, ServiceStatus::Error);
        assert_eq!(response.messages, vec!["Ingredient ID mismatch."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ingredient_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let update = IngredientUpdate {
            ingredient_id: 7,
            name: "Walnut".to_string(),
            benefits: "Omega-3".to_string(),
            unit_price: 2.75,
            image_path: None,
        };
        let response = update_ingredient(&db, 7, &update).await?;
        assert_eq!(response.status, ServiceStatus::NotFound);
        assert_eq!(response.messages, vec!["Ingredient not found."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ingredient_changes_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;

        let update = IngredientUpdate {
            ingredient_id: almond.id,
            name: "Roasted Almond".to_string(),
            benefits: "Vitamin E, roasted".to_string(),
            unit_price: 1.80,
            image_path: Some("images/almond.png".to_string()),
        };
        let response = update_ingredient(&db, almond.id, &update).await?;
        assert_eq!(response.status, ServiceStatus::Updated);

        let summary = find_ingredient(&db, almond.id).await?.unwrap();
        assert_eq!(summary.name, "Roasted Almond");
        assert_eq!(summary.unit_price, 1.80);
        assert_eq!(summary.image_path.as_deref(), Some("images/almond.png"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ingredient_cascades_entries() -> Result<()> {
        let (db, _subject, assessment) = setup_with_assessment().await?;
        let almond = create_test_ingredient(&db, "Almond", 1.50).await?;
        let entry = create_test_brain_food(&db, assessment.id, almond.id, 2).await?;
        let member = create_test_member(&db, "Alice").await?;
        let purchase = create_test_purchase(&db, member.id, &[entry.id]).await?;

        let response = delete_ingredient(&db, almond.id).await?;
        assert_eq!(response.status, ServiceStatus::Deleted);

        assert!(Ingredient::find_by_id(almond.id).one(&db).await?.is_none());
        assert!(BrainFood::find_by_id(entry.id).one(&db).await?.is_none());
        assert!(
            PurchaseBrainFood::find()
                .filter(purchase_brain_food::Column::PurchaseId.eq(purchase.id))
                .all(&db)
                .await?
                .is_empty()
        );
        // The assessment and the purchase record survive.
        assert!(
            crate::entities::Assessment::find_by_id(assessment.id)
                .one(&db)
                .await?
                .is_some()
        );
        assert!(
            crate::entities::Purchase::find_by_id(purchase.id)
                .one(&db)
                .await?
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ingredient_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let response = delete_ingredient(&db, 19).await?;
        assert_eq!(response.status, ServiceStatus::NotFound);
        assert_eq!(response.messages, vec!["Ingredient not found."]);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_ingredients_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog: CatalogConfig = toml::from_str(
            r#"
            [[ingredients]]
            name = "Almond"
            benefits = "Vitamin E"
            unit_price = 1.5

            [[ingredients]]
            name = "Blueberry"
            benefits = "Antioxidants"
            unit_price = 3.25
            image_path = "images/blueberry.png"
        "#,
        )
        .unwrap();

        let inserted = seed_ingredients(&db, &catalog).await?;
        assert_eq!(inserted, 2);

        let again = seed_ingredients(&db, &catalog).await?;
        assert_eq!(again, 0);

        let all = get_all_ingredients(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Almond");
        assert_eq!(all[1].image_path.as_deref(), Some("images/blueberry.png"));

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_ingredients_skips_invalid_price() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog: CatalogConfig = toml::from_str(
            r#"
            [[ingredients]]
            name = "Almond"
            benefits = "Vitamin E"
            unit_price = 1.5

            [[ingredients]]
            name = "Mystery Berry"
            benefits = "Unknown"
            unit_price = -2.0
        "#,
        )
        .unwrap();

        let inserted = seed_ingredients(&db, &catalog).await?;
        assert_eq!(inserted, 1);

        let all = get_all_ingredients(&db).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Almond");

        Ok(())
    }
}
