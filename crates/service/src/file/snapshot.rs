//! Read-only JSON snapshot adapter.
//!
//! The snapshot document (an array of restaurants in the wire shape) is
//! loaded once at construction and never mutated afterwards, so readers
//! share it without locking. Write operations always fail.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::repository::RestaurantRepository;
use models::menu;

#[derive(Clone)]
pub struct FileRestaurantRepository {
    restaurants: Arc<Vec<menu::Restaurant>>,
}

impl FileRestaurantRepository {
    /// Load the snapshot from `path`. An unreadable or malformed document
    /// degrades to an empty record set with a logged warning instead of
    /// failing startup.
    pub async fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let restaurants = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<menu::Restaurant>>(&bytes) {
                Ok(list) => {
                    info!(path = %path.display(), count = list.len(), "loaded restaurant snapshot");
                    list
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed restaurant snapshot; serving empty set");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read restaurant snapshot; serving empty set");
                Vec::new()
            }
        };
        Self { restaurants: Arc::new(restaurants) }
    }

    /// Build from in-memory records, bypassing the filesystem.
    pub fn from_records(records: Vec<menu::Restaurant>) -> Self {
        Self { restaurants: Arc::new(records) }
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

#[async_trait]
impl RestaurantRepository for FileRestaurantRepository {
    async fn find_all(&self) -> Result<Vec<menu::Restaurant>, ServiceError> {
        Ok(self.restaurants.as_ref().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
        Ok(self.restaurants.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn save(&self, _restaurant: menu::Restaurant) -> Result<menu::Restaurant, ServiceError> {
        Err(ServiceError::read_only("save"))
    }

    async fn delete_by_id(&self, _id: i64) -> Result<(), ServiceError> {
        Err(ServiceError::read_only("delete"))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.restaurants.iter().any(|r| r.id == Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::menu::{Plat, Restaurant};

    fn records() -> Vec<Restaurant> {
        vec![
            Restaurant {
                id: Some(1),
                name: "Le Bistrot".into(),
                plats: vec![Plat { id: Some(1), name: "Quiche".into(), price: 8.0, disponible: Some(true) }],
            },
            Restaurant { id: Some(2), name: "Trattoria".into(), plats: vec![] },
        ]
    }

    async fn write_snapshot(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("snapshot_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn loads_snapshot_and_serves_reads() {
        let path = write_snapshot(&serde_json::to_string(&records()).unwrap()).await;
        let repo = FileRestaurantRepository::load(&path).await;

        assert_eq!(repo.find_all().await.unwrap().len(), 2);
        let one = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(one.name, "Le Bistrot");
        assert!(repo.exists_by_id(2).await.unwrap());
        assert!(repo.find_by_id(99).await.unwrap().is_none());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn writes_always_fail_and_never_mutate() {
        let repo = FileRestaurantRepository::from_records(records());

        let attempt = Restaurant { id: None, name: "Intruder".into(), plats: vec![] };
        assert!(matches!(repo.save(attempt).await, Err(ServiceError::ReadOnlySource(_))));
        assert!(matches!(repo.delete_by_id(1).await, Err(ServiceError::ReadOnlySource(_))));

        // Reads are unchanged after the failed writes.
        assert_eq!(repo.find_all().await.unwrap(), records());
        assert!(repo.exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_reads_are_idempotent() {
        let repo = FileRestaurantRepository::from_records(records());
        let first = repo.find_all().await.unwrap();
        let second = repo.find_all().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_file_degrades_to_empty_set() {
        let repo = FileRestaurantRepository::load("/nonexistent/restaurants.json").await;
        assert!(repo.is_empty());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_degrades_to_empty_set() {
        let path = write_snapshot("{not json").await;
        let repo = FileRestaurantRepository::load(&path).await;
        assert_eq!(repo.len(), 0);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
