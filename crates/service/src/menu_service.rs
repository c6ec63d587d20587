//! Strategy dispatch over the two repository adapters.
//!
//! The strategy is a flat configuration switch fixed at startup: each read
//! routes to the file adapter, the database adapter, or both; writes
//! always target the database adapter.

use tracing::{info, instrument};

use crate::db::restaurant_service::DbRestaurantRepository;
use crate::errors::ServiceError;
use crate::file::snapshot::FileRestaurantRepository;
use crate::repository::RestaurantRepository;
use configs::Strategy;
use models::menu;

pub struct MenuService {
    strategy: Strategy,
    db_repo: DbRestaurantRepository,
    file_repo: FileRestaurantRepository,
}

impl MenuService {
    pub fn new(strategy: Strategy, db_repo: DbRestaurantRepository, file_repo: FileRestaurantRepository) -> Self {
        info!(?strategy, "menu service initialized");
        Self { strategy, db_repo, file_repo }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// All restaurants from the configured source(s). In combined mode the
    /// database records come first, then the file records; ids shared by
    /// both sources are kept as duplicates.
    #[instrument(skip(self))]
    pub async fn get_all_restaurants(&self) -> Result<Vec<menu::Restaurant>, ServiceError> {
        match self.strategy {
            Strategy::FileOnly => self.file_repo.find_all().await,
            Strategy::DbOnly => self.db_repo.find_all().await,
            Strategy::Combined => {
                let mut combined = self.db_repo.find_all().await?;
                let from_file = self.file_repo.find_all().await?;
                info!(db = combined.len(), file = from_file.len(), "combined read");
                combined.extend(from_file);
                Ok(combined)
            }
        }
    }

    /// One restaurant from the configured source(s). Combined mode tries
    /// the database first and falls back to the file snapshot.
    #[instrument(skip(self))]
    pub async fn get_restaurant_by_id(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
        match self.strategy {
            Strategy::FileOnly => self.file_repo.find_by_id(id).await,
            Strategy::DbOnly => self.db_repo.find_by_id(id).await,
            Strategy::Combined => {
                if let Some(found) = self.db_repo.find_by_id(id).await? {
                    return Ok(Some(found));
                }
                self.file_repo.find_by_id(id).await
            }
        }
    }

    // Explicit single-source accessors, bypassing the strategy.

    pub async fn get_all_from_file(&self) -> Result<Vec<menu::Restaurant>, ServiceError> {
        self.file_repo.find_all().await
    }

    pub async fn get_from_file(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
        self.file_repo.find_by_id(id).await
    }

    pub async fn get_all_from_db(&self) -> Result<Vec<menu::Restaurant>, ServiceError> {
        self.db_repo.find_all().await
    }

    pub async fn get_from_db(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
        self.db_repo.find_by_id(id).await
    }

    // Writes: the file source is never a write target.

    #[instrument(skip(self, restaurant), fields(name = %restaurant.name))]
    pub async fn save_restaurant(&self, restaurant: menu::Restaurant) -> Result<menu::Restaurant, ServiceError> {
        self.db_repo.save(restaurant).await
    }

    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: i64) -> Result<(), ServiceError> {
        self.db_repo.delete_by_id(id).await
    }

    pub async fn restaurant_exists(&self, id: i64) -> Result<bool, ServiceError> {
        self.db_repo.exists_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::restaurant_service::save_restaurant;
    use crate::test_support::get_db;
    use models::menu::{Plat, Restaurant};

    fn file_records() -> Vec<Restaurant> {
        vec![
            Restaurant {
                id: Some(100),
                name: "Snapshot Diner".into(),
                plats: vec![Plat { id: Some(1), name: "Burger".into(), price: 7.5, disponible: None }],
            },
            Restaurant { id: Some(101), name: "Snapshot Cafe".into(), plats: vec![] },
        ]
    }

    async fn service_with(strategy: Strategy) -> Result<MenuService, anyhow::Error> {
        let db = get_db().await?;
        save_restaurant(&db, Restaurant { id: None, name: "Db Grill".into(), plats: vec![] }).await?;
        save_restaurant(
            &db,
            Restaurant {
                id: Some(100),
                name: "Db Diner".into(),
                plats: vec![Plat { id: None, name: "Steak".into(), price: 19.0, disponible: Some(true) }],
            },
        )
        .await?;
        Ok(MenuService::new(
            strategy,
            DbRestaurantRepository { db },
            FileRestaurantRepository::from_records(file_records()),
        ))
    }

    #[tokio::test]
    async fn file_only_reads_route_to_snapshot() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::FileOnly).await?;
        let all = svc.get_all_restaurants().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(svc.get_restaurant_by_id(101).await?.unwrap().name, "Snapshot Cafe");
        Ok(())
    }

    #[tokio::test]
    async fn db_only_reads_ignore_snapshot() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::DbOnly).await?;
        assert!(svc.get_restaurant_by_id(101).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn combined_concatenates_db_before_file_without_dedup() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::Combined).await?;
        let all = svc.get_all_restaurants().await?;
        let db_count = svc.get_all_from_db().await?.len();
        let file_count = svc.get_all_from_file().await?.len();
        assert_eq!(all.len(), db_count + file_count);
        // Database-sourced records first; id 100 exists in both and stays duplicated.
        assert_eq!(&all[..db_count], &svc.get_all_from_db().await?[..]);
        assert_eq!(all.iter().filter(|r| r.id == Some(100)).count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn combined_lookup_prefers_database_record() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::Combined).await?;
        let found = svc.get_restaurant_by_id(100).await?.unwrap();
        assert_eq!(found.name, "Db Diner");
        // Absent from the database, present in the file: falls back.
        let fallback = svc.get_restaurant_by_id(101).await?.unwrap();
        assert_eq!(fallback.name, "Snapshot Cafe");
        Ok(())
    }

    #[tokio::test]
    async fn writes_target_database_even_in_file_only_mode() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::FileOnly).await?;
        let saved = svc
            .save_restaurant(Restaurant { id: None, name: "New Place".into(), plats: vec![] })
            .await?;
        let id = saved.id.unwrap();
        assert!(svc.restaurant_exists(id).await?);
        svc.delete_restaurant(id).await?;
        assert!(!svc.restaurant_exists(id).await?);
        // The snapshot is untouched.
        assert_eq!(svc.get_all_from_file().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn explicit_accessors_bypass_strategy() -> Result<(), anyhow::Error> {
        let svc = service_with(Strategy::DbOnly).await?;
        assert_eq!(svc.get_from_file(100).await?.unwrap().name, "Snapshot Diner");
        assert_eq!(svc.get_from_db(100).await?.unwrap().name, "Db Diner");
        Ok(())
    }
}
