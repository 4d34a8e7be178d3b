//! Brain food business logic - Handles all brain-food-related operations.
//!
//! A brain food entry ties a quantity of one ingredient to one assessment.
//! This module resolves those references into display summaries and manages
//! the entry lifecycle, including purchase-link cleanup on delete.

use crate::{
    entities::{
        Assessment, BrainFood, Ingredient, Member, Purchase, PurchaseBrainFood, brain_food,
        ingredient, purchase, purchase_brain_food,
    },
    errors::Result,
    models::{BrainFoodPurchase, BrainFoodSummary, BrainFoodUpdate, ServiceResponse},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Preloaded reference data for building brain food summaries.
///
/// Loading this once amortizes the ingredient, assessment, and purchase
/// lookups across a whole listing instead of issuing per-entry queries.
#[derive(Debug, Clone, Default)]
pub struct BrainFoodContext {
    /// Ingredients keyed by id
    pub ingredients: HashMap<i32, ingredient::Model>,
    /// Assessment titles keyed by assessment id
    pub assessment_titles: HashMap<i32, String>,
    /// Purchases covering each brain food entry, keyed by brain food id
    pub purchases_by_brain_food: HashMap<i32, Vec<BrainFoodPurchase>>,
}

/// Loads the ingredients, assessment titles, and purchase links needed to
/// summarize brain food entries.
pub async fn load_brain_food_context(db: &DatabaseConnection) -> Result<BrainFoodContext> {
    let ingredients: HashMap<i32, ingredient::Model> = Ingredient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let assessment_titles: HashMap<i32, String> = Assessment::find()
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a.title))
        .collect();

    let member_names: HashMap<i32, String> = Member::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let purchases: HashMap<i32, purchase::Model> = Purchase::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut purchases_by_brain_food: HashMap<i32, Vec<BrainFoodPurchase>> = HashMap::new();
    for link in PurchaseBrainFood::find().all(db).await? {
        let purchase = match purchases.get(&link.purchase_id) {
            Some(purchase) => purchase,
            None => continue,
        };
        let member_name = member_names
            .get(&purchase.member_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        purchases_by_brain_food
            .entry(link.brain_food_id)
            .or_default()
            .push(BrainFoodPurchase {
                member_name,
                date_purchased: purchase.date_purchased,
            });
    }

    Ok(BrainFoodContext {
        ingredients,
        assessment_titles,
        purchases_by_brain_food,
    })
}

/// Builds the display summary for one brain food entry, resolving ingredient
/// and assessment references against the preloaded context.
///
/// A missing ingredient yields the name "Unknown", empty benefits, and a zero
/// unit price; a missing assessment yields the name "Unknown".
#[must_use]
pub fn summarize_brain_food(
    brain_food: &brain_food::Model,
    ctx: &BrainFoodContext,
) -> BrainFoodSummary {
    let (ingredient_name, benefits, unit_price) = match ctx.ingredients.get(&brain_food.ingredient_id)
    {
        Some(ingredient) => (
            ingredient.name.clone(),
            ingredient.benefits.clone(),
            ingredient.unit_price,
        ),
        None => ("Unknown".to_string(), String::new(), 0.0),
    };

    BrainFoodSummary {
        brain_food_id: brain_food.id,
        quantity: brain_food.quantity,
        ingredient_id: brain_food.ingredient_id,
        ingredient_name,
        benefits,
        unit_price,
        assessment_id: brain_food.assessment_id,
        assessment_name: ctx
            .assessment_titles
            .get(&brain_food.assessment_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        purchases: ctx
            .purchases_by_brain_food
            .get(&brain_food.id)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Retrieves all brain food entries as display summaries, ordered by id.
pub async fn get_all_brain_foods(db: &DatabaseConnection) -> Result<Vec<BrainFoodSummary>> {
    let entries = BrainFood::find()
        .order_by_asc(brain_food::Column::Id)
        .all(db)
        .await?;
    let ctx = load_brain_food_context(db).await?;
    Ok(entries
        .iter()
        .map(|entry| summarize_brain_food(entry, &ctx))
        .collect())
}

/// Finds a single brain food entry by its id, returning None if absent.
pub async fn find_brain_food(db: &DatabaseConnection, id: i32) -> Result<Option<BrainFoodSummary>> {
    let entry = match BrainFood::find_by_id(id).one(db).await? {
        Some(entry) => entry,
        None => return Ok(None),
    };
    let ctx = load_brain_food_context(db).await?;
    Ok(Some(summarize_brain_food(&entry, &ctx)))
}

/// Creates a new brain food entry for an assessment/ingredient pair.
///
/// The quantity must be at least 1. An unknown assessment or ingredient id
/// surfaces as an `Error` response from the foreign key check.
pub async fn add_brain_food(
    db: &DatabaseConnection,
    quantity: i32,
    assessment_id: i32,
    ingredient_id: i32,
) -> Result<ServiceResponse> {
    if quantity < 1 {
        return Ok(ServiceResponse::error_with(
            "Error adding brain food.",
            "Quantity must be at least 1.",
        ));
    }

    let entry = brain_food::ActiveModel {
        quantity: Set(quantity),
        assessment_id: Set(assessment_id),
        ingredient_id: Set(ingredient_id),
        ..Default::default()
    };

    match entry.insert(db).await {
        Ok(model) => Ok(ServiceResponse::created(model.id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding brain food.",
            e.to_string(),
        )),
    }
}

/// Replaces a brain food entry's quantity and both of its references.
///
/// The path id must match `update.brain_food_id` or the call is refused.
pub async fn update_brain_food(
    db: &DatabaseConnection,
    id: i32,
    update: &BrainFoodUpdate,
) -> Result<ServiceResponse> {
    if id != update.brain_food_id {
        return Ok(ServiceResponse::error("BrainFood ID mismatch."));
    }

    let entry = match BrainFood::find_by_id(id).one(db).await? {
        Some(entry) => entry,
        None => return Ok(ServiceResponse::not_found("BrainFood not found.")),
    };

    if update.quantity < 1 {
        return Ok(ServiceResponse::error_with(
            "Error updating brain food.",
            "Quantity must be at least 1.",
        ));
    }

    let mut active: brain_food::ActiveModel = entry.into();
    active.quantity = Set(update.quantity);
    active.assessment_id = Set(update.assessment_id);
    active.ingredient_id = Set(update.ingredient_id);

    match active.update(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating brain food.",
            e.to_string(),
        )),
    }
}

/// Deletes a brain food entry together with its purchase links.
pub async fn delete_brain_food(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let entry = match BrainFood::find_by_id(id).one(db).await? {
        Some(entry) => entry,
        None => return Ok(ServiceResponse::not_found("BrainFood not found.")),
    };

    match delete_brain_food_graph(db, entry.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error deleting brain food.",
            e.to_string(),
        )),
    }
}

/// Removes a brain food entry and its purchase links in one transaction.
async fn delete_brain_food_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let unlinked = PurchaseBrainFood::delete_many()
        .filter(purchase_brain_food::Column::BrainFoodId.eq(id))
        .exec(&txn)
        .await?;
    BrainFood::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Deleted brain food entry {} and {} purchase links",
        id,
        unlinked.rows_affected
    );
    Ok(())
}
