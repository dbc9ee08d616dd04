use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use parkeasy_catalog::filter::FilterCriteria;
use parkeasy_catalog::spot::{LocationType, ParkingSpot, PriceUnit};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchSpotsRequest {
    /// Free-text query from the search bar; recorded into recent searches
    /// and applied as the location criterion when none is set explicitly
    #[serde(default)]
    pub query: Option<String>,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpotRequest {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_unit: PriceUnit,
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub total_slots: i32,
    pub distance_km: Option<f64>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/spots", get(list_spots))
        .route("/v1/spots/search", post(search_spots))
        .route("/v1/spots/{id}", get(get_spot))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/v1/spots", post(create_spot))
}

/// GET /v1/spots
/// The full catalog, in listing order
async fn list_spots(State(state): State<AppState>) -> Result<Json<Vec<ParkingSpot>>, AppError> {
    let spots = state
        .spots
        .list_spots()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(Json(spots))
}

/// POST /v1/spots/search
/// Run the filter engine over the catalog
async fn search_spots(
    State(state): State<AppState>,
    Json(req): Json<SearchSpotsRequest>,
) -> Result<Json<Vec<ParkingSpot>>, AppError> {
    let mut criteria = req.criteria;

    if let Some(query) = req.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        state.recent.record(query);
        if criteria.location.is_none() {
            criteria.location = Some(query.to_string());
        }
    }

    let spots = state
        .spots
        .list_spots()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(state.filter_engine.apply(&spots, &criteria)))
}

/// GET /v1/spots/{id}
async fn get_spot(
    State(state): State<AppState>,
    Path(spot_id): Path<Uuid>,
) -> Result<Json<ParkingSpot>, AppError> {
    let spot = state
        .spots
        .get_spot(spot_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Parking spot not found".to_string()))?;

    Ok(Json(spot))
}

/// POST /v1/spots
/// List a new space (provider flow); the caller becomes the owner
async fn create_spot(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateSpotRequest>,
) -> Result<(StatusCode, Json<ParkingSpot>), AppError> {
    if req.price <= 0.0 {
        return Err(AppError::ValidationError("Price must be positive".to_string()));
    }
    if req.total_slots <= 0 {
        return Err(AppError::ValidationError(
            "A listing needs at least one slot".to_string(),
        ));
    }

    let spot = ParkingSpot {
        id: Uuid::new_v4(),
        name: req.name,
        address: req.address,
        description: req.description,
        images: req.images,
        price: req.price,
        price_unit: req.price_unit,
        rating: 0.0,
        reviews: 0,
        distance_km: req.distance_km,
        features: req.features,
        location_type: req.location_type,
        available: true,
        total_slots: req.total_slots,
        available_slots: req.total_slots,
        is_popular: false,
        owner_id: Some(claims.sub),
    };

    state
        .slots
        .lock()
        .await
        .initialize(spot.id, spot.total_slots, spot.available_slots);

    state
        .spots
        .insert_spot(spot.clone())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(spot)))
}
