//! sea-orm CRUD over the restaurant aggregate. `save` and `delete` each
//! run as one transaction; reads are plain pooled queries.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::errors::ServiceError;
use crate::repository::RestaurantRepository;
use models::{dish, menu, restaurant};

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

pub async fn list_restaurants(db: &DatabaseConnection) -> Result<Vec<menu::Restaurant>, ServiceError> {
    let rows = restaurant::Entity::find()
        .find_with_related(dish::Entity)
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(rows
        .into_iter()
        .map(|(r, dishes)| menu::Restaurant::from_rows(r, dishes))
        .collect())
}

pub async fn get_restaurant(db: &DatabaseConnection, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
    let Some(row) = restaurant::Entity::find_by_id(id).one(db).await.map_err(db_err)? else {
        return Ok(None);
    };
    let dishes = dish::Entity::find()
        .filter(dish::Column::RestaurantId.eq(id))
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(Some(menu::Restaurant::from_rows(row, dishes)))
}

pub async fn exists_restaurant(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    let count = restaurant::Entity::find_by_id(id)
        .count(db)
        .await
        .map_err(db_err)?;
    Ok(count > 0)
}

/// Insert or update the restaurant and mirror its dish list exactly:
/// new dishes are inserted, matched dishes updated, and stored dishes
/// absent from the input deleted.
pub async fn save_restaurant(
    db: &DatabaseConnection,
    input: menu::Restaurant,
) -> Result<menu::Restaurant, ServiceError> {
    input.validate()?;

    let txn = db.begin().await.map_err(db_err)?;

    let restaurant_id = match input.id {
        None => {
            let am = restaurant::ActiveModel { id: NotSet, name: Set(input.name.clone()) };
            am.insert(&txn).await.map_err(db_err)?.id
        }
        Some(id) => {
            match restaurant::Entity::find_by_id(id).one(&txn).await.map_err(db_err)? {
                Some(existing) => {
                    let mut am: restaurant::ActiveModel = existing.into();
                    am.name = Set(input.name.clone());
                    am.update(&txn).await.map_err(db_err)?;
                }
                None => {
                    // Externally supplied identifier (seed data); keep it.
                    let am = restaurant::ActiveModel { id: Set(id), name: Set(input.name.clone()) };
                    am.insert(&txn).await.map_err(db_err)?;
                }
            }
            id
        }
    };

    mirror_dishes(&txn, restaurant_id, &input.plats).await?;

    txn.commit().await.map_err(db_err)?;

    get_restaurant(db, restaurant_id)
        .await?
        .ok_or_else(|| ServiceError::Db("saved restaurant missing after commit".into()))
}

async fn mirror_dishes<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: i64,
    plats: &[menu::Plat],
) -> Result<(), ServiceError> {
    let existing = dish::Entity::find()
        .filter(dish::Column::RestaurantId.eq(restaurant_id))
        .all(conn)
        .await
        .map_err(db_err)?;
    let existing_ids: HashSet<i64> = existing.iter().map(|d| d.id).collect();
    let supplied_ids: HashSet<i64> = plats.iter().filter_map(|p| p.id).collect();

    // Orphan removal: stored dishes the input no longer lists.
    for row in &existing {
        if !supplied_ids.contains(&row.id) {
            dish::Entity::delete_by_id(row.id).exec(conn).await.map_err(db_err)?;
        }
    }

    for plat in plats {
        match plat.id {
            Some(id) if existing_ids.contains(&id) => {
                let am = dish::ActiveModel {
                    id: Set(id),
                    restaurant_id: Set(restaurant_id),
                    name: Set(plat.name.clone()),
                    price: Set(plat.price),
                    disponible: Set(plat.disponible),
                };
                am.update(conn).await.map_err(db_err)?;
            }
            Some(id) => {
                // Not one of this restaurant's dishes; a row with that id
                // under another restaurant is bad input, not a store error.
                if let Some(owner) = dish::Entity::find_by_id(id).one(conn).await.map_err(db_err)? {
                    return Err(ServiceError::Validation(format!(
                        "dish id {id} already belongs to restaurant {}",
                        owner.restaurant_id
                    )));
                }
                let am = dish::ActiveModel {
                    id: Set(id),
                    restaurant_id: Set(restaurant_id),
                    name: Set(plat.name.clone()),
                    price: Set(plat.price),
                    disponible: Set(plat.disponible),
                };
                am.insert(conn).await.map_err(db_err)?;
            }
            None => {
                let am = dish::ActiveModel {
                    id: NotSet,
                    restaurant_id: Set(restaurant_id),
                    name: Set(plat.name.clone()),
                    price: Set(plat.price),
                    disponible: Set(plat.disponible),
                };
                am.insert(conn).await.map_err(db_err)?;
            }
        }
    }
    Ok(())
}

/// Remove the restaurant and its dishes. Dishes are deleted explicitly
/// inside the same transaction rather than relying on the FK pragma.
/// Deleting an absent id is reported as `NotFound`.
pub async fn delete_restaurant(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    let txn = db.begin().await.map_err(db_err)?;
    if restaurant::Entity::find_by_id(id).one(&txn).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("restaurant"));
    }
    dish::Entity::delete_many()
        .filter(dish::Column::RestaurantId.eq(id))
        .exec(&txn)
        .await
        .map_err(db_err)?;
    restaurant::Entity::delete_by_id(id).exec(&txn).await.map_err(db_err)?;
    txn.commit().await.map_err(db_err)?;
    Ok(())
}

/// Embedded-database adapter: a direct pass-through to the functions above.
pub struct DbRestaurantRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RestaurantRepository for DbRestaurantRepository {
    async fn find_all(&self) -> Result<Vec<menu::Restaurant>, ServiceError> {
        list_restaurants(&self.db).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<menu::Restaurant>, ServiceError> {
        get_restaurant(&self.db, id).await
    }

    async fn save(&self, restaurant: menu::Restaurant) -> Result<menu::Restaurant, ServiceError> {
        save_restaurant(&self.db, restaurant).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        delete_restaurant(&self.db, id).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        exists_restaurant(&self.db, id).await
    }
}
