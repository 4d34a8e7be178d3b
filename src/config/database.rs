//! Database configuration module for QuizCart.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{
    Assessment, BrainFood, Ingredient, Member, MemberSubject, Purchase, PurchaseBrainFood, Subject,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file, created on first use if missing.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://quizcart.sqlite?mode=rwc".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. Parent tables are created before the tables that reference them so the
/// generated foreign keys resolve. Statements use IF NOT EXISTS, so a second run against
/// an existing database file is a no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Subject),
        schema.create_table_from_entity(Assessment),
        schema.create_table_from_entity(Ingredient),
        schema.create_table_from_entity(BrainFood),
        schema.create_table_from_entity(Purchase),
        schema.create_table_from_entity(MemberSubject),
        schema.create_table_from_entity(PurchaseBrainFood),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
    }
    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        assessment::Model as AssessmentModel, brain_food::Model as BrainFoodModel,
        ingredient::Model as IngredientModel, member::Model as MemberModel,
        member_subject::Model as MemberSubjectModel, purchase::Model as PurchaseModel,
        purchase_brain_food::Model as PurchaseBrainFoodModel, subject::Model as SubjectModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection() -> Result<()> {
        // Use in-memory database for testing to avoid touching an existing database file
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that we can execute a query to verify the connection is working
        let _: Vec<MemberModel> = Member::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_rerunnable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<MemberModel> = Member::find().limit(1).all(&db).await?;
        let _: Vec<SubjectModel> = Subject::find().limit(1).all(&db).await?;
        let _: Vec<AssessmentModel> = Assessment::find().limit(1).all(&db).await?;
        let _: Vec<IngredientModel> = Ingredient::find().limit(1).all(&db).await?;
        let _: Vec<BrainFoodModel> = BrainFood::find().limit(1).all(&db).await?;
        let _: Vec<PurchaseModel> = Purchase::find().limit(1).all(&db).await?;
        let _: Vec<MemberSubjectModel> = MemberSubject::find().limit(1).all(&db).await?;
        let _: Vec<PurchaseBrainFoodModel> = PurchaseBrainFood::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_default_database_url() -> Result<()> {
        // Without DATABASE_URL set the default local file URL is used
        if std::env::var("DATABASE_URL").is_err() {
            let url = get_database_url()?;
            assert!(url.starts_with("sqlite://"));
        }
        Ok(())
    }
}
