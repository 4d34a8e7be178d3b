//! Display DTOs, mutation inputs, and the service result envelope.
//!
//! Summaries are flat, display-ready records produced by the aggregation
//! functions in [`crate::core`]. They serialize camelCase to match the JSON
//! shapes the API surface expects.

use crate::entities::assessment::Difficulty;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a mutation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// A new entity was inserted
    Created,
    /// An existing entity or link was modified
    Updated,
    /// The entity and its dependent rows were removed
    Deleted,
    /// The target entity or link does not exist
    NotFound,
    /// The input was refused or persistence failed
    Error,
}

/// Uniform result envelope returned by every mutation operation.
///
/// No errors cross the service boundary under normal operation; persistence
/// failures are folded into an `Error` status carrying the failure text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// Status of the operation
    pub status: ServiceStatus,
    /// Human-readable messages describing the outcome
    pub messages: Vec<String>,
    /// Identifier of the newly created entity, for Created results
    pub created_id: Option<i32>,
}

impl ServiceResponse {
    /// A `Created` response carrying the new entity's id.
    /// Success responses carry no messages; the status alone is the signal.
    #[must_use]
    pub fn created(id: i32) -> Self {
        Self {
            status: ServiceStatus::Created,
            messages: Vec::new(),
            created_id: Some(id),
        }
    }

    /// An `Updated` response
    #[must_use]
    pub fn updated() -> Self {
        Self {
            status: ServiceStatus::Updated,
            messages: Vec::new(),
            created_id: None,
        }
    }

    /// A `Deleted` response
    #[must_use]
    pub fn deleted() -> Self {
        Self {
            status: ServiceStatus::Deleted,
            messages: Vec::new(),
            created_id: None,
        }
    }

    /// A `NotFound` response with a reason
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::NotFound,
            messages: vec![message.into()],
            created_id: None,
        }
    }

    /// An `Error` response with a reason
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Error,
            messages: vec![message.into()],
            created_id: None,
        }
    }

    /// An `Error` response with a context line plus the underlying failure text
    #[must_use]
    pub fn error_with(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Error,
            messages: vec![message.into(), detail.into()],
            created_id: None,
        }
    }
}

/// One page of an ordered aggregation result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    /// The items on this page
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total_count: u64,
    /// 1-based page number
    pub page: u64,
    /// Requested page size
    pub page_size: u64,
}

/// Member with cost-sharing figures and enrollment counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    /// Member's unique identifier
    pub member_id: i32,
    /// Member's display name
    pub name: String,
    /// Member's contact email
    pub email: String,
    /// Equal share of the group total minus what this member has paid;
    /// negative means the group owes the member money back
    pub amount_owed: f64,
    /// Sum of line totals across this member's purchases
    pub amount_paid: f64,
    /// Count of subjects the member is enrolled in
    pub total_subjects: usize,
    /// Assessments across all subjects the member is enrolled in
    pub total_assessments: usize,
}

/// Subject with enrollment and assessment counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    /// Subject's unique identifier
    pub subject_id: i32,
    /// Subject name
    pub name: String,
    /// Free-form subject description
    pub description: String,
    /// Count of assessments under this subject
    pub total_assessments: usize,
    /// Count of members enrolled in this subject
    pub total_members: usize,
}

/// Assessment with resolved subject, enrolled member names, and brain foods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    /// Assessment's unique identifier
    pub assessment_id: i32,
    /// Assessment title
    pub title: String,
    /// Free-form assessment description
    pub description: String,
    /// Calendar date the assessment takes place
    pub date_of_assessment: NaiveDate,
    /// Difficulty rating
    pub difficulty_level: Difficulty,
    /// Parent subject's name, "Unknown" if it failed to resolve
    pub subject_name: String,
    /// Names of members enrolled in the parent subject
    pub member_names: Vec<String>,
    /// Brain food entries attached to this assessment
    pub brain_foods: Vec<BrainFoodSummary>,
}

/// One purchase touching a brain food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainFoodPurchase {
    /// Name of the member who paid
    pub member_name: String,
    /// Date of the purchase
    pub date_purchased: NaiveDate,
}

/// Brain food entry with resolved ingredient and assessment details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainFoodSummary {
    /// Entry's unique identifier
    pub brain_food_id: i32,
    /// Units of the ingredient in this entry
    pub quantity: i32,
    /// Id of the ingredient used
    pub ingredient_id: i32,
    /// Ingredient name, "Unknown" if it failed to resolve
    pub ingredient_name: String,
    /// Benefits text from the ingredient
    pub benefits: String,
    /// Unit price from the ingredient, 0.0 if it failed to resolve
    pub unit_price: f64,
    /// Id of the assessment the entry belongs to
    pub assessment_id: i32,
    /// Assessment title, "Unknown" if it failed to resolve
    pub assessment_name: String,
    /// Every purchase that covers this entry
    pub purchases: Vec<BrainFoodPurchase>,
}

/// Ingredient with usage statistics across assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummary {
    /// Ingredient's unique identifier
    pub ingredient_id: i32,
    /// Ingredient name
    pub name: String,
    /// Free-form description of study benefits
    pub benefits: String,
    /// Price per unit
    pub unit_price: f64,
    /// Optional path to a catalog image
    pub image_path: Option<String>,
    /// Count of distinct assessments this ingredient appears in
    pub total_assessments: usize,
    /// One entry per brain food row using this ingredient
    pub assessments_used_in: Vec<BrainFoodSummary>,
}

/// One line of a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    /// Name of the ingredient bought
    pub ingredient_name: String,
    /// Units bought
    pub quantity: i32,
    /// Price per unit
    pub unit_price: f64,
    /// quantity × unit price
    pub total: f64,
}

/// Purchase with resolved member name, line items, and totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    /// Purchase's unique identifier
    pub purchase_id: i32,
    /// Date of the purchase
    pub date_purchased: NaiveDate,
    /// Paying member's name, "Unknown" if it failed to resolve
    pub member_name: String,
    /// Sum of all item totals
    pub total_amount: f64,
    /// Distinct ingredient names across the items
    pub ingredient_names: Vec<String>,
    /// One line per linked brain food entry
    pub items: Vec<PurchaseItem>,
}

/// Full-replacement update input for a member; `member_id` must match the
/// target id or the update is refused
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    /// Id of the member being updated
    pub member_id: i32,
    /// Replacement name
    pub name: String,
    /// Replacement email
    pub email: String,
}

/// Full-replacement update input for a subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectUpdate {
    /// Id of the subject being updated
    pub subject_id: i32,
    /// Replacement name
    pub name: String,
    /// Replacement description
    pub description: String,
}

/// Full-replacement update input for an assessment's scalar fields; the
/// owning subject is fixed at creation and not updatable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentUpdate {
    /// Id of the assessment being updated
    pub assessment_id: i32,
    /// Replacement title
    pub title: String,
    /// Replacement description
    pub description: String,
    /// Replacement assessment date
    pub date_of_assessment: NaiveDate,
    /// Replacement difficulty rating
    pub difficulty_level: Difficulty,
}

/// Full-replacement update input for an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUpdate {
    /// Id of the ingredient being updated
    pub ingredient_id: i32,
    /// Replacement name
    pub name: String,
    /// Replacement benefits text
    pub benefits: String,
    /// Replacement price per unit
    pub unit_price: f64,
    /// Replacement image path, None to clear it
    pub image_path: Option<String>,
}

/// Full-replacement update input for a brain food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainFoodUpdate {
    /// Id of the entry being updated
    pub brain_food_id: i32,
    /// Replacement quantity
    pub quantity: i32,
    /// Replacement assessment reference
    pub assessment_id: i32,
    /// Replacement ingredient reference
    pub ingredient_id: i32,
}

/// Full-replacement update input for a purchase: new date plus the complete
/// set of brain food ids the purchase should cover after the update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseUpdate {
    /// Id of the purchase being updated
    pub purchase_id: i32,
    /// Replacement purchase date
    pub date_purchased: NaiveDate,
    /// Complete replacement set of linked brain food entry ids
    pub brain_food_ids: Vec<i32>,
}
