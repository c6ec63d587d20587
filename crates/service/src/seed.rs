//! One-shot database seeding from a bundled JSON document.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{error, info};

use crate::db::restaurant_service;
use crate::errors::ServiceError;
use models::{menu, restaurant};

/// Seed the restaurant table from `path` (an array in the wire shape).
/// Skipped when the table already holds rows, so restarts do not
/// duplicate data. A missing or malformed seed file is logged and
/// ignored; startup continues. Returns the number of records loaded.
pub async fn seed_database(db: &DatabaseConnection, path: &str) -> Result<usize, ServiceError> {
    let existing = restaurant::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing > 0 {
        info!(existing, "database already seeded; skipping");
        return Ok(0);
    }

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path, error = %e, "cannot read seed file; database starts empty");
            return Ok(0);
        }
    };
    let records: Vec<menu::Restaurant> = match serde_json::from_slice(&bytes) {
        Ok(records) => records,
        Err(e) => {
            error!(path, error = %e, "malformed seed file; database starts empty");
            return Ok(0);
        }
    };

    let mut loaded = 0usize;
    for record in records {
        restaurant_service::save_restaurant(db, record).await?;
        loaded += 1;
    }
    info!(path, loaded, "seeded database from file");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::restaurant_service::list_restaurants;
    use crate::test_support::get_db;
    use models::menu::{Plat, Restaurant};

    fn seed_records() -> Vec<Restaurant> {
        vec![
            Restaurant {
                id: Some(1),
                name: "Chez Marie".into(),
                plats: vec![Plat { id: Some(1), name: "Ratatouille".into(), price: 12.5, disponible: Some(true) }],
            },
            Restaurant { id: Some(2), name: "La Cantine".into(), plats: vec![] },
        ]
    }

    async fn write_seed() -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("seed_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, serde_json::to_vec(&seed_records()).unwrap()).await.unwrap();
        path
    }

    #[tokio::test]
    async fn seeds_empty_database_and_keeps_ids() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let path = write_seed().await;

        let n = seed_database(&db, path.to_str().unwrap()).await?;
        assert_eq!(n, 2);
        let all = list_restaurants(&db).await?;
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|r| r.id == Some(2) && r.name == "La Cantine"));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let path = write_seed().await;

        seed_database(&db, path.to_str().unwrap()).await?;
        let again = seed_database(&db, path.to_str().unwrap()).await?;
        assert_eq!(again, 0);
        assert_eq!(list_restaurants(&db).await?.len(), 2);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_seed_file_leaves_database_empty() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let n = seed_database(&db, "/nonexistent/seed.json").await?;
        assert_eq!(n, 0);
        assert!(list_restaurants(&db).await?.is_empty());
        Ok(())
    }
}
