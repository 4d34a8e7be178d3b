//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod assessment;
pub mod brain_food;
pub mod ingredient;
pub mod member;
pub mod member_subject;
pub mod purchase;
pub mod purchase_brain_food;
pub mod subject;

// Re-export specific types to avoid conflicts
pub use assessment::{Column as AssessmentColumn, Entity as Assessment, Model as AssessmentModel};
pub use brain_food::{Column as BrainFoodColumn, Entity as BrainFood, Model as BrainFoodModel};
pub use ingredient::{Column as IngredientColumn, Entity as Ingredient, Model as IngredientModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use member_subject::{
    Column as MemberSubjectColumn, Entity as MemberSubject, Model as MemberSubjectModel,
};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use purchase_brain_food::{
    Column as PurchaseBrainFoodColumn, Entity as PurchaseBrainFood, Model as PurchaseBrainFoodModel,
};
pub use subject::{Column as SubjectColumn, Entity as Subject, Model as SubjectModel};
