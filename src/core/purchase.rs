//! Purchase business logic - Handles all purchase-related operations.
//!
//! A purchase is one member's dated transaction covering a set of brain food
//! entries. This module resolves those links into priced line items, manages
//! the purchase lifecycle, and provides the purchase/brain-food link and
//! unlink operations plus the compound create-with-entry flow used by the
//! shopping form.

use crate::{
    entities::{
        Assessment, BrainFood, Ingredient, Member, Purchase, PurchaseBrainFood, brain_food,
        purchase, purchase_brain_food,
    },
    errors::Result,
    models::{PurchaseItem, PurchaseSummary, PurchaseUpdate, ServiceResponse},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Preloaded reference data for building purchase summaries.
#[derive(Debug, Clone, Default)]
pub struct PurchaseContext {
    /// Member names keyed by member id
    pub member_names: HashMap<i32, String>,
    /// Priced line items keyed by purchase id, one per linked brain food
    pub items_by_purchase: HashMap<i32, Vec<PurchaseItem>>,
}

/// Loads member names and priced line items for every purchase.
///
/// Line items are derived from the purchase/brain-food links; a link whose
/// brain food row is missing is skipped, and a missing ingredient yields the
/// name "Unknown" with a zero unit price.
pub async fn load_purchase_context(db: &DatabaseConnection) -> Result<PurchaseContext> {
    let member_names: HashMap<i32, String> = Member::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let ingredients: HashMap<i32, (String, f64)> = Ingredient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.id, (i.name, i.unit_price)))
        .collect();

    let brain_foods: HashMap<i32, brain_food::Model> = BrainFood::find()
        .all(db)
        .await?
        .into_iter()
        .map(|bf| (bf.id, bf))
        .collect();

    let mut items_by_purchase: HashMap<i32, Vec<PurchaseItem>> = HashMap::new();
    for link in PurchaseBrainFood::find().all(db).await? {
        let entry = match brain_foods.get(&link.brain_food_id) {
            Some(entry) => entry,
            None => continue,
        };
        let (ingredient_name, unit_price) = match ingredients.get(&entry.ingredient_id) {
            Some((name, price)) => (name.clone(), *price),
            None => ("Unknown".to_string(), 0.0),
        };
        items_by_purchase
            .entry(link.purchase_id)
            .or_default()
            .push(PurchaseItem {
                ingredient_name,
                quantity: entry.quantity,
                unit_price,
                total: f64::from(entry.quantity) * unit_price,
            });
    }

    Ok(PurchaseContext {
        member_names,
        items_by_purchase,
    })
}

/// Builds the display summary for one purchase: resolved member name, line
/// items, their grand total, and the distinct ingredient names involved.
#[must_use]
pub fn summarize_purchase(purchase: &purchase::Model, ctx: &PurchaseContext) -> PurchaseSummary {
    let items = ctx
        .items_by_purchase
        .get(&purchase.id)
        .cloned()
        .unwrap_or_default();

    let total_amount = items.iter().map(|item| item.total).sum();

    let mut ingredient_names: Vec<String> = Vec::new();
    for item in &items {
        if !ingredient_names.contains(&item.ingredient_name) {
            ingredient_names.push(item.ingredient_name.clone());
        }
    }

    PurchaseSummary {
        purchase_id: purchase.id,
        date_purchased: purchase.date_purchased,
        member_name: ctx
            .member_names
            .get(&purchase.member_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        total_amount,
        ingredient_names,
        items,
    }
}

/// Retrieves all purchases as display summaries, ordered by id.
pub async fn get_all_purchases(db: &DatabaseConnection) -> Result<Vec<PurchaseSummary>> {
    let purchases = Purchase::find()
        .order_by_asc(purchase::Column::Id)
        .all(db)
        .await?;
    let ctx = load_purchase_context(db).await?;
    Ok(purchases.iter().map(|p| summarize_purchase(p, &ctx)).collect())
}

/// Finds a single purchase by its id, returning None if absent.
pub async fn find_purchase(db: &DatabaseConnection, id: i32) -> Result<Option<PurchaseSummary>> {
    let purchase = match Purchase::find_by_id(id).one(db).await? {
        Some(purchase) => purchase,
        None => return Ok(None),
    };
    let ctx = load_purchase_context(db).await?;
    Ok(Some(summarize_purchase(&purchase, &ctx)))
}

/// Retrieves all purchases made by one member, ordered by id.
pub async fn get_purchases_by_member(
    db: &DatabaseConnection,
    member_id: i32,
) -> Result<Vec<PurchaseSummary>> {
    let purchases = Purchase::find()
        .filter(purchase::Column::MemberId.eq(member_id))
        .order_by_asc(purchase::Column::Id)
        .all(db)
        .await?;
    let ctx = load_purchase_context(db).await?;
    Ok(purchases.iter().map(|p| summarize_purchase(p, &ctx)).collect())
}

/// Creates a purchase for a member, linking it to the given brain food
/// entries. Unknown brain food ids are skipped rather than failing the call.
pub async fn add_purchase(
    db: &DatabaseConnection,
    member_id: i32,
    date_purchased: NaiveDate,
    brain_food_ids: &[i32],
) -> Result<ServiceResponse> {
    if Member::find_by_id(member_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Member not found."));
    }

    match insert_purchase_graph(db, member_id, date_purchased, brain_food_ids).await {
        Ok(id) => Ok(ServiceResponse::created(id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding purchase.",
            e.to_string(),
        )),
    }
}

/// Replaces a purchase's date and its complete set of brain food links.
///
/// The path id must match `update.purchase_id`. The paying member is fixed at
/// creation and not updatable.
pub async fn update_purchase(
    db: &DatabaseConnection,
    id: i32,
    update: &PurchaseUpdate,
) -> Result<ServiceResponse> {
    if id != update.purchase_id {
        return Ok(ServiceResponse::error("Purchase ID mismatch."));
    }

    let purchase = match Purchase::find_by_id(id).one(db).await? {
        Some(purchase) => purchase,
        None => return Ok(ServiceResponse::not_found("Purchase not found.")),
    };

    match replace_purchase_graph(db, purchase, update).await {
        Ok(()) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating purchase.",
            e.to_string(),
        )),
    }
}

/// Deletes a purchase together with its brain food links. The linked brain
/// food entries themselves are left in place.
pub async fn delete_purchase(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let purchase = match Purchase::find_by_id(id).one(db).await? {
        Some(purchase) => purchase,
        None => return Ok(ServiceResponse::not_found("Purchase not found.")),
    };

    match delete_purchase_graph(db, purchase.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error deleting purchase.",
            e.to_string(),
        )),
    }
}

/// Links a brain food entry to a purchase. Linking an already linked pair is
/// a no-op that still reports Updated.
pub async fn link_brain_food(
    db: &DatabaseConnection,
    purchase_id: i32,
    brain_food_id: i32,
) -> Result<ServiceResponse> {
    let purchase = Purchase::find_by_id(purchase_id).one(db).await?;
    let entry = BrainFood::find_by_id(brain_food_id).one(db).await?;
    if purchase.is_none() || entry.is_none() {
        return Ok(ServiceResponse::not_found("Purchase or BrainFood not found."));
    }

    let already_linked = PurchaseBrainFood::find_by_id((purchase_id, brain_food_id))
        .one(db)
        .await?
        .is_some();
    if already_linked {
        return Ok(ServiceResponse::updated());
    }

    let link = purchase_brain_food::ActiveModel {
        purchase_id: Set(purchase_id),
        brain_food_id: Set(brain_food_id),
    };
    match link.insert(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error linking brain food.",
            e.to_string(),
        )),
    }
}

/// Unlinks a brain food entry from a purchase. The pair must currently be
/// linked; the underlying entities are never deleted.
pub async fn unlink_brain_food(
    db: &DatabaseConnection,
    purchase_id: i32,
    brain_food_id: i32,
) -> Result<ServiceResponse> {
    if Purchase::find_by_id(purchase_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Purchase not found."));
    }

    let link = match PurchaseBrainFood::find_by_id((purchase_id, brain_food_id))
        .one(db)
        .await?
    {
        Some(link) => link,
        None => return Ok(ServiceResponse::not_found("BrainFood not linked to purchase.")),
    };

    match link.delete(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error unlinking brain food.",
            e.to_string(),
        )),
    }
}

/// Compound create used by the shopping form: records a new brain food entry
/// and a purchase covering it in one unit.
///
/// The member and ingredient references are checked up front; the assessment
/// reference is left to the foreign key check, so an unknown assessment id
/// rolls the whole insert back as an Error response.
pub async fn add_purchase_with_brain_food(
    db: &DatabaseConnection,
    member_id: i32,
    date_purchased: NaiveDate,
    quantity: i32,
    ingredient_id: i32,
    assessment_id: i32,
) -> Result<ServiceResponse> {
    if Member::find_by_id(member_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Member not found."));
    }
    if Ingredient::find_by_id(ingredient_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Ingredient not found."));
    }
    if quantity < 1 {
        return Ok(ServiceResponse::error_with(
            "Error adding purchase.",
            "Quantity must be at least 1.",
        ));
    }

    let insert = insert_purchase_with_entry(
        db,
        member_id,
        date_purchased,
        quantity,
        ingredient_id,
        assessment_id,
    )
    .await;
    match insert {
        Ok(id) => Ok(ServiceResponse::created(id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error adding purchase.",
            e.to_string(),
        )),
    }
}

/// Compound update used by the shopping form: points the purchase at a newly
/// created brain food entry instead of mutating the previous one.
///
/// Existing links are cleared but the old brain food rows are left in place,
/// so other purchases referencing them keep their history.
pub async fn update_purchase_with_brain_food(
    db: &DatabaseConnection,
    id: i32,
    date_purchased: NaiveDate,
    quantity: i32,
    ingredient_id: i32,
    assessment_id: i32,
) -> Result<ServiceResponse> {
    if Purchase::find_by_id(id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Purchase not found."));
    }
    if Ingredient::find_by_id(ingredient_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Ingredient not found."));
    }
    if Assessment::find_by_id(assessment_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Assessment not found."));
    }
    if quantity < 1 {
        return Ok(ServiceResponse::error_with(
            "Error updating purchase.",
            "Quantity must be at least 1.",
        ));
    }

    let replace = replace_purchase_with_entry(
        db,
        id,
        date_purchased,
        quantity,
        ingredient_id,
        assessment_id,
    )
    .await;
    match replace {
        Ok(()) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error updating purchase.",
            e.to_string(),
        )),
    }
}

/// Inserts a purchase and its links in one transaction, keeping only the
/// brain food ids that actually exist.
async fn insert_purchase_graph(
    db: &DatabaseConnection,
    member_id: i32,
    date_purchased: NaiveDate,
    brain_food_ids: &[i32],
) -> Result<i32> {
    let existing = existing_brain_food_ids(db, brain_food_ids).await?;
    let link_count = existing.len();

    let txn = db.begin().await?;

    let purchase = purchase::ActiveModel {
        date_purchased: Set(date_purchased),
        member_id: Set(member_id),
        ..Default::default()
    };
    let purchase = purchase.insert(&txn).await?;

    for brain_food_id in existing {
        let link = purchase_brain_food::ActiveModel {
            purchase_id: Set(purchase.id),
            brain_food_id: Set(brain_food_id),
        };
        link.insert(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Created purchase {} with {} brain food links",
        purchase.id,
        link_count
    );
    Ok(purchase.id)
}

/// Rewrites a purchase's date and full link set in one transaction.
async fn replace_purchase_graph(
    db: &DatabaseConnection,
    purchase: purchase::Model,
    update: &PurchaseUpdate,
) -> Result<()> {
    let existing = existing_brain_food_ids(db, &update.brain_food_ids).await?;
    let link_count = existing.len();

    let txn = db.begin().await?;

    let purchase_id = purchase.id;
    let mut active: purchase::ActiveModel = purchase.into();
    active.date_purchased = Set(update.date_purchased);
    active.update(&txn).await?;

    PurchaseBrainFood::delete_many()
        .filter(purchase_brain_food::Column::PurchaseId.eq(purchase_id))
        .exec(&txn)
        .await?;

    for brain_food_id in existing {
        let link = purchase_brain_food::ActiveModel {
            purchase_id: Set(purchase_id),
            brain_food_id: Set(brain_food_id),
        };
        link.insert(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Updated purchase {} with {} brain food links",
        purchase_id,
        link_count
    );
    Ok(())
}

/// Removes a purchase and its links in one transaction.
async fn delete_purchase_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let unlinked = PurchaseBrainFood::delete_many()
        .filter(purchase_brain_food::Column::PurchaseId.eq(id))
        .exec(&txn)
        .await?;
    Purchase::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Deleted purchase {} and {} brain food links",
        id,
        unlinked.rows_affected
    );
    Ok(())
}

/// Creates the brain food entry, the purchase, and the link between them in
/// one transaction.
async fn insert_purchase_with_entry(
    db: &DatabaseConnection,
    member_id: i32,
    date_purchased: NaiveDate,
    quantity: i32,
    ingredient_id: i32,
    assessment_id: i32,
) -> Result<i32> {
    let txn = db.begin().await?;

    let entry = brain_food::ActiveModel {
        quantity: Set(quantity),
        assessment_id: Set(assessment_id),
        ingredient_id: Set(ingredient_id),
        ..Default::default()
    };
    let entry = entry.insert(&txn).await?;

    let purchase = purchase::ActiveModel {
        date_purchased: Set(date_purchased),
        member_id: Set(member_id),
        ..Default::default()
    };
    let purchase = purchase.insert(&txn).await?;

    let link = purchase_brain_food::ActiveModel {
        purchase_id: Set(purchase.id),
        brain_food_id: Set(entry.id),
    };
    link.insert(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Created purchase {} with new brain food entry {}",
        purchase.id,
        entry.id
    );
    Ok(purchase.id)
}

/// Re-dates the purchase and swaps its links over to a freshly inserted
/// brain food entry in one transaction.
async fn replace_purchase_with_entry(
    db: &DatabaseConnection,
    id: i32,
    date_purchased: NaiveDate,
    quantity: i32,
    ingredient_id: i32,
    assessment_id: i32,
) -> Result<()> {
    let txn = db.begin().await?;

    let active = purchase::ActiveModel {
        id: Set(id),
        date_purchased: Set(date_purchased),
        ..Default::default()
    };
    active.update(&txn).await?;

    PurchaseBrainFood::delete_many()
        .filter(purchase_brain_food::Column::PurchaseId.eq(id))
        .exec(&txn)
        .await?;

    let entry = brain_food::ActiveModel {
        quantity: Set(quantity),
        assessment_id: Set(assessment_id),
        ingredient_id: Set(ingredient_id),
        ..Default::default()
    };
    let entry = entry.insert(&txn).await?;

    let link = purchase_brain_food::ActiveModel {
        purchase_id: Set(id),
        brain_food_id: Set(entry.id),
    };
    link.insert(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Updated purchase {} onto new brain food entry {}",
        id,
        entry.id
    );
    Ok(())
}

/// Filters the requested link targets down to the ids actually present.
async fn existing_brain_food_ids(db: &DatabaseConnection, ids: &[i32]) -> Result<Vec<i32>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = BrainFood::find()
        .filter(brain_food::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    Ok(found.into_iter().map(|bf| bf.id).collect())
}
