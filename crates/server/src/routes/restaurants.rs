use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::errors::JsonApiError;
use crate::routes::ServerState;
use models::menu;
use service::errors::ServiceError;

/// GET /restaurants — all restaurants from the configured data source(s).
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<menu::Restaurant>>, JsonApiError> {
    match state.menu.get_all_restaurants().await {
        Ok(list) => {
            info!(count = list.len(), strategy = ?state.menu.strategy(), "list restaurants");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "list restaurants failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

/// GET /restaurants/:id
pub async fn get(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<menu::Restaurant>, StatusCode> {
    match state.menu.get_restaurant_by_id(id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, id, "get restaurant failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /restaurants — create with dishes; ids are assigned by the store.
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<menu::Restaurant>,
) -> Result<(StatusCode, Json<menu::Restaurant>), JsonApiError> {
    match state.menu.save_restaurant(input).await {
        Ok(m) => {
            info!(id = ?m.id, name = %m.name, dishes = m.plats.len(), "created restaurant");
            Ok((StatusCode::CREATED, Json(m)))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
            }
            _ => {
                error!(err = %e, "create restaurant failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
            }
        },
    }
}

/// DELETE /restaurants/:id — existence is checked before mutating; the
/// check targets the database store, which is the only write target.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    match state.menu.restaurant_exists(id).await {
        Ok(true) => {}
        Ok(false) => return StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, id, "existence check failed");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
    match state.menu.delete_restaurant(id).await {
        Ok(()) => {
            info!(id, "deleted restaurant");
            StatusCode::NO_CONTENT
        }
        // The record vanished between the pre-check and the delete.
        Err(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, id, "delete restaurant failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
