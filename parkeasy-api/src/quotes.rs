use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use parkeasy_offer::{Quote, QuoteError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/quotes", post(create_quote))
        .route("/v1/quotes/{id}", get(get_quote))
}

/// POST /v1/quotes
/// Price a window for a spot; the quote holds for the configured window
async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Json<Quote>, AppError> {
    let spot = state
        .spots
        .get_spot(req.spot_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Parking spot not found".to_string()))?;

    let quote = state
        .quote_generator
        .quote_spot(&spot, None, req.start_time, req.end_time)
        .map_err(quote_error)?;

    let mut book = state.quotes.lock().await;
    // Opportunistic sweep keeps the book from accumulating dead holds
    book.cleanup_expired();
    book.store_quote(quote.clone());

    Ok(Json(quote))
}

/// GET /v1/quotes/{id}
/// An expired quote is gone, not missing
async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<Quote>, AppError> {
    let book = state.quotes.lock().await;

    match book.get_quote(&quote_id) {
        Some(quote) if quote.is_active() => Ok(Json(quote.clone())),
        Some(_) => Err(AppError::GoneError("Quote expired".to_string())),
        None => Err(AppError::NotFoundError("Quote not found".to_string())),
    }
}

fn quote_error(err: QuoteError) -> AppError {
    match err {
        QuoteError::InvalidWindow => AppError::ValidationError(err.to_string()),
        QuoteError::SpotUnavailable(_) => AppError::ConflictError(err.to_string()),
    }
}
