use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parkeasy_core::payment::{
    ChargeRequest, NewPaymentMethod, PaymentError, PaymentMethod, PaymentRecord, PaymentStatus,
};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    pub amount: f64,
    pub currency: Option<String>,
    pub payment_method_id: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub id: String,
    pub status: PaymentStatus,
    pub verified: bool,
    pub verified_at: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments/methods", post(add_payment_method))
        .route("/v1/payments/process", post(process_payment))
        .route("/v1/payments/{id}/verify", get(verify_payment))
}

/// POST /v1/payments/methods
/// Validate and tokenize a card or UPI instrument, then attach it to the
/// caller's account
async fn add_payment_method(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<NewPaymentMethod>,
) -> Result<Json<PaymentMethod>, AppError> {
    let method = state
        .gateway
        .register_method(req)
        .await
        .map_err(payment_error)?;

    state
        .users
        .add_payment_method(&claims.sub, method.clone())
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(method))
}

/// POST /v1/payments/process
/// Standalone simulated charge
async fn process_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<Json<PaymentRecord>, AppError> {
    if req.amount <= 0.0 {
        return Err(AppError::ValidationError(
            "Amount must be positive".to_string(),
        ));
    }

    let record = state
        .gateway
        .process_payment(ChargeRequest {
            amount: req.amount,
            currency: req
                .currency
                .unwrap_or_else(|| state.business_rules.currency.clone()),
            method_id: req.payment_method_id,
            description: Some(
                req.description
                    .unwrap_or_else(|| "Parking payment".to_string()),
            ),
        })
        .await
        .map_err(payment_error)?;

    tracing::info!(payment_id = %record.id, customer = %claims.sub, "Charge processed");

    Ok(Json(record))
}

/// GET /v1/payments/{id}/verify
async fn verify_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let record = state
        .gateway
        .verify_payment(&payment_id)
        .await
        .map_err(payment_error)?;

    Ok(Json(VerifyPaymentResponse {
        id: record.id,
        status: record.status,
        verified: true,
        verified_at: Utc::now(),
    }))
}

fn payment_error(err: PaymentError) -> AppError {
    match err {
        PaymentError::Declined => AppError::PaymentDeclined(err.to_string()),
        PaymentError::NotFound(_) => AppError::NotFoundError(err.to_string()),
        other => AppError::ValidationError(other.to_string()),
    }
}
