use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use parkeasy_core::identity::Vehicle;
use parkeasy_store::{RecentSearch, UserAccount, UserStoreError};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users/me", get(me))
        .route("/v1/users/vehicles", post(add_vehicle))
        .route("/v1/users/vehicles/{id}", delete(remove_vehicle))
        .route("/v1/users/favorites/{spot_id}", post(add_favorite))
        .route("/v1/users/favorites/{spot_id}", delete(remove_favorite))
        .route("/v1/users/searches", get(recent_searches).delete(clear_searches))
}

/// GET /v1/users/me
async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<UserAccount>, AppError> {
    let account = state.users.get(&claims.sub).map_err(user_error)?;
    Ok(Json(account))
}

/// POST /v1/users/vehicles
async fn add_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(vehicle): Json<Vehicle>,
) -> Result<Json<UserAccount>, AppError> {
    let account = state
        .users
        .add_vehicle(&claims.sub, vehicle)
        .map_err(user_error)?;
    Ok(Json(account))
}

/// DELETE /v1/users/vehicles/{id}
async fn remove_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<UserAccount>, AppError> {
    let account = state
        .users
        .remove_vehicle(&claims.sub, &vehicle_id)
        .map_err(user_error)?;
    Ok(Json(account))
}

/// POST /v1/users/favorites/{spot_id}
/// Idempotent; favoriting twice is a no-op
async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(spot_id): Path<Uuid>,
) -> Result<Json<UserAccount>, AppError> {
    // Only real spots can be favorited
    state
        .spots
        .get_spot(spot_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Parking spot not found".to_string()))?;

    let account = state
        .users
        .add_favorite(&claims.sub, spot_id)
        .map_err(user_error)?;
    Ok(Json(account))
}

/// DELETE /v1/users/favorites/{spot_id}
async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(spot_id): Path<Uuid>,
) -> Result<Json<UserAccount>, AppError> {
    let account = state
        .users
        .remove_favorite(&claims.sub, spot_id)
        .map_err(user_error)?;
    Ok(Json(account))
}

/// GET /v1/users/searches
async fn recent_searches(
    State(state): State<AppState>,
    Extension(_claims): Extension<CustomerClaims>,
) -> Json<Vec<RecentSearch>> {
    Json(state.recent.list())
}

/// DELETE /v1/users/searches
async fn clear_searches(
    State(state): State<AppState>,
    Extension(_claims): Extension<CustomerClaims>,
) -> Json<Vec<RecentSearch>> {
    state.recent.clear();
    Json(Vec::new())
}

fn user_error(err: UserStoreError) -> AppError {
    match err {
        UserStoreError::NotFound(_) => AppError::NotFoundError(err.to_string()),
    }
}
