//! Member business logic - Cost sharing and the member lifecycle.
//!
//! The group splits its total spend evenly: each member's owed amount is the
//! equal share of everything the group has paid minus what that member has
//! paid themselves, so the owed amounts across all members net out to zero.
//! Spend is tallied per purchase link, so a brain food entry covered by two
//! purchases is counted in both.

use crate::{
    entities::{
        Assessment, BrainFood, Ingredient, Member, MemberSubject, Purchase, PurchaseBrainFood,
        Subject, member, member_subject, purchase, purchase_brain_food,
    },
    errors::Result,
    models::{MemberSummary, MemberUpdate, PaginatedResult, ServiceResponse},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;

/// Group-wide payment figures derived from every purchase link.
#[derive(Debug, Clone, Default)]
pub struct SpendingLedger {
    /// Line-total sums keyed by paying member id
    pub paid_by_member: HashMap<i32, f64>,
    /// Sum of all members' payments
    pub group_total: f64,
}

/// Subject enrollment counts used for member summaries.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentIndex {
    /// Linked subject ids keyed by member id
    pub subjects_by_member: HashMap<i32, Vec<i32>>,
    /// Assessment counts keyed by subject id
    pub assessments_per_subject: HashMap<i32, usize>,
}

/// Tallies what every member has paid across all purchases.
///
/// Each purchase/brain-food link contributes quantity times the ingredient's
/// unit price; a missing ingredient contributes zero.
pub async fn load_spending_ledger(db: &DatabaseConnection) -> Result<SpendingLedger> {
    let unit_prices: HashMap<i32, f64> = Ingredient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.id, i.unit_price))
        .collect();

    let brain_foods: HashMap<i32, (i32, i32)> = BrainFood::find()
        .all(db)
        .await?
        .into_iter()
        .map(|bf| (bf.id, (bf.quantity, bf.ingredient_id)))
        .collect();

    let paying_member: HashMap<i32, i32> = Purchase::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.member_id))
        .collect();

    let mut ledger = SpendingLedger::default();
    for link in PurchaseBrainFood::find().all(db).await? {
        let (quantity, ingredient_id) = match brain_foods.get(&link.brain_food_id) {
            Some(entry) => *entry,
            None => continue,
        };
        let member_id = match paying_member.get(&link.purchase_id) {
            Some(member_id) => *member_id,
            None => continue,
        };
        let unit_price = unit_prices.get(&ingredient_id).copied().unwrap_or(0.0);
        let line_total = f64::from(quantity) * unit_price;

        *ledger.paid_by_member.entry(member_id).or_insert(0.0) += line_total;
        ledger.group_total += line_total;
    }

    Ok(ledger)
}

/// Loads the member/subject links and per-subject assessment counts.
pub async fn load_enrollment_index(db: &DatabaseConnection) -> Result<EnrollmentIndex> {
    let mut subjects_by_member: HashMap<i32, Vec<i32>> = HashMap::new();
    for link in MemberSubject::find().all(db).await? {
        subjects_by_member
            .entry(link.member_id)
            .or_default()
            .push(link.subject_id);
    }

    let mut assessments_per_subject: HashMap<i32, usize> = HashMap::new();
    for assessment in Assessment::find().all(db).await? {
        *assessments_per_subject
            .entry(assessment.subject_id)
            .or_insert(0) += 1;
    }

    Ok(EnrollmentIndex {
        subjects_by_member,
        assessments_per_subject,
    })
}

/// Computes one member's equal share of the group total.
///
/// Returns 0.0 for an empty group instead of dividing by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn equal_share(group_total: f64, member_count: usize) -> f64 {
    if member_count == 0 {
        return 0.0;
    }

    group_total / member_count as f64
}

/// Builds the display summary for one member from the preloaded group
/// figures. `share` is the equal split of the group total across all current
/// members, regardless of when each member joined.
#[must_use]
pub fn summarize_member(
    member: &member::Model,
    share: f64,
    ledger: &SpendingLedger,
    enrollment: &EnrollmentIndex,
) -> MemberSummary {
    let amount_paid = ledger
        .paid_by_member
        .get(&member.id)
        .copied()
        .unwrap_or(0.0);
    let subject_ids = enrollment.subjects_by_member.get(&member.id);
    let total_subjects = subject_ids.map_or(0, Vec::len);
    let total_assessments = subject_ids.map_or(0, |ids| {
        ids.iter()
            .map(|subject_id| {
                enrollment
                    .assessments_per_subject
                    .get(subject_id)
                    .copied()
                    .unwrap_or(0)
            })
            .sum()
    });

    MemberSummary {
        member_id: member.id,
        name: member.name.clone(),
        email: member.email.clone(),
        amount_owed: share - amount_paid,
        amount_paid,
        total_subjects,
        total_assessments,
    }
}

/// Retrieves all members with their cost-sharing figures, ordered by id.
///
/// An empty member table yields an empty list, never a division by zero.
pub async fn get_all_members(db: &DatabaseConnection) -> Result<Vec<MemberSummary>> {
    let members = Member::find()
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?;
    if members.is_empty() {
        return Ok(Vec::new());
    }

    let ledger = load_spending_ledger(db).await?;
    let enrollment = load_enrollment_index(db).await?;
    let share = equal_share(ledger.group_total, members.len());

    Ok(members
        .iter()
        .map(|m| summarize_member(m, share, &ledger, &enrollment))
        .collect())
}

/// Finds a single member by id together with their cost-sharing figures,
/// returning None if absent.
///
/// The share is always computed against the full member roster, so a lookup
/// and a listing report the same owed amount.
pub async fn find_member(db: &DatabaseConnection, id: i32) -> Result<Option<MemberSummary>> {
    let members = Member::find().all(db).await?;
    let target = match members.iter().find(|m| m.id == id) {
        Some(target) => target,
        None => return Ok(None),
    };

    let ledger = load_spending_ledger(db).await?;
    let enrollment = load_enrollment_index(db).await?;
    let share = equal_share(ledger.group_total, members.len());

    Ok(Some(summarize_member(target, share, &ledger, &enrollment)))
}

/// Retrieves one page of member summaries ordered by name.
///
/// Pages are 1-based; a page or page size of zero is clamped to 1. The cost
/// figures are computed over the whole roster, not just the page.
pub async fn get_paginated_members(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
) -> Result<PaginatedResult<MemberSummary>> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let members = Member::find()
        .order_by_asc(member::Column::Name)
        .all(db)
        .await?;
    let total_count = members.len() as u64;

    let ledger = load_spending_ledger(db).await?;
    let enrollment = load_enrollment_index(db).await?;
    let share = equal_share(ledger.group_total, members.len());

    let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let items = members
        .iter()
        .skip(offset)
        .take(take)
        .map(|m| summarize_member(m, share, &ledger, &enrollment))
        .collect();

    Ok(PaginatedResult {
        items,
        total_count,
        page,
        page_size,
    })
}

/// Creates a new member.
pub async fn add_member(
    db: &DatabaseConnection,
    name: String,
    email: String,
) -> Result<ServiceResponse> {
    let member = member::ActiveModel {
        name: Set(name),
        email: Set(email),
        ..Default::default()
    };

    match member.insert(db).await {
        Ok(model) => Ok(ServiceResponse::created(model.id)),
        Err(e) => Ok(ServiceResponse::error_with(
            "There was an error adding the Member.",
            e.to_string(),
        )),
    }
}

/// Replaces a member's name and email.
///
/// The path id must match `update.member_id`. A failed write triggers an
/// existence re-check so a concurrently deleted member reports NotFound
/// rather than Error.
pub async fn update_member(
    db: &DatabaseConnection,
    id: i32,
    update: &MemberUpdate,
) -> Result<ServiceResponse> {
    if id != update.member_id {
        return Ok(ServiceResponse::error("Member ID mismatch."));
    }

    let member = match Member::find_by_id(id).one(db).await? {
        Some(member) => member,
        None => return Ok(ServiceResponse::not_found("Member not found.")),
    };

    let mut active: member::ActiveModel = member.into();
    active.name = Set(update.name.clone());
    active.email = Set(update.email.clone());

    match active.update(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(_) => {
            if Member::find_by_id(id).one(db).await?.is_none() {
                Ok(ServiceResponse::not_found(
                    "Member not found after concurrency check.",
                ))
            } else {
                Ok(ServiceResponse::error(
                    "An error occurred while updating the member.",
                ))
            }
        }
    }
}

/// Deletes a member together with their purchases, purchase links, and
/// subject enrollments.
pub async fn delete_member(db: &DatabaseConnection, id: i32) -> Result<ServiceResponse> {
    let member = match Member::find_by_id(id).one(db).await? {
        Some(member) => member,
        None => {
            return Ok(ServiceResponse::not_found(
                "Member cannot be deleted because it does not exist.",
            ));
        }
    };

    match delete_member_graph(db, member.id).await {
        Ok(()) => Ok(ServiceResponse::deleted()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error encountered while deleting the member.",
            e.to_string(),
        )),
    }
}

/// Enrolls a member in a subject. Linking an already linked pair is a no-op
/// that still reports Updated.
pub async fn link_subject(
    db: &DatabaseConnection,
    member_id: i32,
    subject_id: i32,
) -> Result<ServiceResponse> {
    let member = Member::find_by_id(member_id).one(db).await?;
    let subject = Subject::find_by_id(subject_id).one(db).await?;
    if member.is_none() || subject.is_none() {
        return Ok(ServiceResponse::not_found("Member or Subject not found."));
    }

    let already_linked = MemberSubject::find_by_id((member_id, subject_id))
        .one(db)
        .await?
        .is_some();
    if already_linked {
        return Ok(ServiceResponse::updated());
    }

    let link = member_subject::ActiveModel {
        member_id: Set(member_id),
        subject_id: Set(subject_id),
    };
    match link.insert(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error linking subject.",
            e.to_string(),
        )),
    }
}

/// Removes a member's enrollment in a subject. The pair must currently be
/// linked; neither entity is deleted.
pub async fn unlink_subject(
    db: &DatabaseConnection,
    member_id: i32,
    subject_id: i32,
) -> Result<ServiceResponse> {
    if Member::find_by_id(member_id).one(db).await?.is_none() {
        return Ok(ServiceResponse::not_found("Member not found."));
    }

    let link = match MemberSubject::find_by_id((member_id, subject_id))
        .one(db)
        .await?
    {
        Some(link) => link,
        None => {
            return Ok(ServiceResponse::not_found(
                "Subject is not linked to the member.",
            ));
        }
    };

    match link.delete(db).await {
        Ok(_) => Ok(ServiceResponse::updated()),
        Err(e) => Ok(ServiceResponse::error_with(
            "Error unlinking subject.",
            e.to_string(),
        )),
    }
}

/// Removes a member, their purchases and purchase links, and their subject
/// enrollments in one transaction.
async fn delete_member_graph(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let purchase_ids: Vec<i32> = Purchase::find()
        .filter(purchase::Column::MemberId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    let purchase_count = purchase_ids.len();

    if !purchase_ids.is_empty() {
        PurchaseBrainFood::delete_many()
            .filter(purchase_brain_food::Column::PurchaseId.is_in(purchase_ids))
            .exec(&txn)
            .await?;
        Purchase::delete_many()
            .filter(purchase::Column::MemberId.eq(id))
            .exec(&txn)
            .await?;
    }

    MemberSubject::delete_many()
        .filter(member_subject::Column::MemberId.eq(id))
        .exec(&txn)
        .await?;
    Member::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!("Deleted member {} along with {} purchases", id, purchase_count);
    Ok(())
}
