use async_trait::async_trait;

use crate::errors::ServiceError;
use models::menu;

/// Read/write contract over restaurant records, independent of backing
/// technology. Exactly two implementations exist: the read-only JSON
/// snapshot adapter and the embedded-database adapter.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Every restaurant in the store, dishes populated, backing-store order.
    async fn find_all(&self) -> Result<Vec<menu::Restaurant>, ServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError>;

    /// Insert when `id` is absent, update when it matches an existing
    /// record. The stored dish list is mirrored from the supplied one:
    /// dishes missing from the input are removed (orphan removal).
    async fn save(&self, restaurant: menu::Restaurant) -> Result<menu::Restaurant, ServiceError>;

    /// Remove the restaurant and cascade to its dishes.
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
}
