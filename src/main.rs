use dotenvy::dotenv;
use quizcart::config::{catalog, database};
use quizcart::core::ingredient::seed_ingredients;
use quizcart::entities::{
    Assessment, BrainFood, Ingredient, Member, MemberSubject, Purchase, PurchaseBrainFood, Subject,
};
use quizcart::errors::Result;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// The manifest enables only tokio's `rt` feature; the provisioning pass is
// sequential and needs no thread pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the ingredient catalog
    let catalog = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load ingredient catalog: {}", e))?;
    info!(
        "Loaded ingredient catalog with {} entries.",
        catalog.ingredients.len()
    );

    // 4. Connect and provision the schema
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create database tables: {}", e))?;

    // 5. Seed catalog ingredients not already present
    seed_ingredients(&db, &catalog)
        .await
        .inspect_err(|e| error!("Failed to seed ingredient catalog: {}", e))?;

    // 6. Report per-table row counts and exit
    report_row_counts(&db).await?;

    Ok(())
}

/// Logs one status line per table so a provisioning run shows what it left behind.
async fn report_row_counts(db: &DatabaseConnection) -> Result<()> {
    info!("members: {} rows", Member::find().count(db).await?);
    info!("subjects: {} rows", Subject::find().count(db).await?);
    info!("assessments: {} rows", Assessment::find().count(db).await?);
    info!("ingredients: {} rows", Ingredient::find().count(db).await?);
    info!("brain_foods: {} rows", BrainFood::find().count(db).await?);
    info!("purchases: {} rows", Purchase::find().count(db).await?);
    info!(
        "member_subjects: {} rows",
        MemberSubject::find().count(db).await?
    );
    info!(
        "purchase_brain_foods: {} rows",
        PurchaseBrainFood::find().count(db).await?
    );
    Ok(())
}
