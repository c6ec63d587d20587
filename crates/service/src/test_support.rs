#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

/// Fresh migrated SQLite database, one file per test so tests stay
/// isolated and can run in parallel.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    tokio::fs::create_dir_all("target/test-data").await?;
    let url = format!("sqlite://target/test-data/{}.db?mode=rwc", uuid::Uuid::new_v4());
    let db = Database::connect(&url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
