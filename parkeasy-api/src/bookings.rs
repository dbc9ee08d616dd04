use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use parkeasy_booking::{Booking, BookingError, ParkingPass, VehicleInfo};
use parkeasy_catalog::slots::SlotError;
use parkeasy_core::payment::{ChargeRequest, PaymentError};
use parkeasy_offer::book::QuoteBookError;
use parkeasy_shared::models::events::{
    BookingCancelledEvent, BookingConfirmedEvent, DomainEvent, PaymentCapturedEvent,
};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub spot_id: Uuid,
    /// Accepting a quote pins the window and total it was priced with
    pub quote_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub vehicle_id: Option<String>,
    pub payment_method_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
    pub pass: ParkingPass,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/bookings
/// Charge, reserve a slot, create the booking and issue its pass
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let spot = state
        .spots
        .get_spot(req.spot_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Parking spot not found".to_string()))?;

    // 1. Resolve the window and total, either from an accepted quote or from
    //    the requested times (the manager prices those itself)
    let (start_time, end_time, total_override) = match req.quote_id {
        Some(quote_id) => {
            let quote = state
                .quotes
                .lock()
                .await
                .accept_quote(&quote_id)
                .map_err(|err| match err {
                    QuoteBookError::NotFound(_) => {
                        AppError::NotFoundError("Quote not found".to_string())
                    }
                    QuoteBookError::Expired(_) => {
                        AppError::GoneError("Quote expired".to_string())
                    }
                })?;

            if quote.spot_id != spot.id {
                return Err(AppError::ValidationError(
                    "Quote was priced for a different spot".to_string(),
                ));
            }

            (quote.start_time, quote.end_time, Some(quote.total))
        }
        None => {
            let (Some(start), Some(end)) = (req.start_time, req.end_time) else {
                return Err(AppError::ValidationError(
                    "Either a quote or a start/end window is required".to_string(),
                ));
            };
            (start, end, None)
        }
    };

    // Reject inverted windows before any slot or money moves; the manager
    // guards this too, but by then a slot would already be held
    if end_time < start_time {
        return Err(AppError::ValidationError(
            "Booking window ends before it starts".to_string(),
        ));
    }

    // 2. Resolve the vehicle snapshot; fall back to the account default,
    //    then to an unidentified vehicle
    let account = state
        .users
        .get(&claims.sub)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let vehicle = req
        .vehicle_id
        .as_deref()
        .and_then(|id| account.vehicles.iter().find(|v| v.id == id))
        .or_else(|| account.vehicles.iter().find(|v| v.is_default))
        .or_else(|| account.vehicles.first())
        .map(|v| VehicleInfo {
            make: v.make.clone(),
            model: v.model.clone(),
            license_plate: v.license_plate.clone(),
        })
        .unwrap_or_else(|| VehicleInfo {
            make: "Unknown".to_string(),
            model: "Car".to_string(),
            license_plate: "UNKNOWN".to_string(),
        });

    let payment_method = account
        .payment_methods
        .iter()
        .find(|m| m.id() == req.payment_method_id)
        .map(|m| m.kind().to_string())
        .unwrap_or_else(|| "card".to_string());

    // 3. Hold a slot before taking money
    {
        let mut slots = state.slots.lock().await;
        slots.reserve(&spot.id, 1).map_err(|err| match err {
            SlotError::InsufficientSlots { .. } => {
                AppError::ConflictError("No slots available for this spot".to_string())
            }
            other => AppError::InternalServerError(other.to_string()),
        })?;
    }

    // 4. Charge; a declined payment releases the held slot
    let total = total_override.unwrap_or_else(|| {
        parkeasy_catalog::pricing::calculate_price_for_unit(
            spot.price,
            spot.price_unit,
            start_time,
            end_time,
        )
    });
    let charge = ChargeRequest {
        amount: total,
        currency: state.business_rules.currency.clone(),
        method_id: req.payment_method_id.clone(),
        description: Some(format!("Parking at {}", spot.name)),
    };

    let record = match state.gateway.process_payment(charge).await {
        Ok(record) => record,
        Err(err) => {
            let mut slots = state.slots.lock().await;
            let _ = slots.release(&spot.id, 1);
            return Err(payment_error(err));
        }
    };

    // 5. Finalize the slot and sync the catalog's availability
    let remaining = {
        let mut slots = state.slots.lock().await;
        slots
            .commit(&spot.id, 1)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        slots.available(&spot.id)
    };
    state
        .spots
        .set_available_slots(spot.id, remaining)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    // 6. Create the booking and its single-use pass
    let mut bookings = state.bookings.lock().await;
    let booking = bookings
        .create_booking(
            &spot,
            claims.sub.clone(),
            vehicle,
            start_time,
            end_time,
            payment_method,
            Some(record.id.clone()),
            Some(total),
        )
        .map_err(booking_error)?;

    let pass = state.passes.lock().await.issue(booking.id);
    bookings
        .attach_pass(&booking.id, pass.token.clone())
        .map_err(booking_error)?;
    let booking = bookings
        .get_booking(&booking.id)
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Booking vanished".to_string()))?;
    drop(bookings);

    // 7. Publish events for live subscribers
    let now = Utc::now().timestamp();
    let _ = state.events_tx.send(DomainEvent::PaymentCaptured(PaymentCapturedEvent {
        payment_id: record.id.clone(),
        customer_id: claims.sub.clone(),
        amount: total,
        currency: record.currency.clone(),
        timestamp: now,
    }));
    let _ = state.events_tx.send(DomainEvent::BookingConfirmed(BookingConfirmedEvent {
        booking_id: booking.id,
        spot_id: spot.id,
        customer_id: claims.sub.clone(),
        total_price: total,
        timestamp: now,
    }));

    info!(booking_id = %booking.id, spot = %spot.name, "Booking confirmed");

    Ok((StatusCode::CREATED, Json(BookingResponse { booking, pass })))
}

/// GET /v1/bookings
/// The caller's bookings, newest first
async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.bookings.lock().await.list_for_customer(&claims.sub);
    Ok(Json(bookings))
}

/// POST /v1/bookings/{id}/cancel
/// Cancel, refund the charge, and release the slot
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let mut bookings = state.bookings.lock().await;

    let booking = bookings
        .get_booking(&booking_id)
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    if booking.customer_id != claims.sub {
        return Err(AppError::AuthorizationError(
            "Booking does not belong to you".to_string(),
        ));
    }

    let cancelled = bookings.cancel(&booking_id).map_err(booking_error)?;
    drop(bookings);

    if let Some(payment_id) = &cancelled.payment_id {
        if let Err(err) = state.gateway.refund(payment_id).await {
            tracing::warn!(payment_id = %payment_id, "Refund failed: {}", err);
        }
    }

    let remaining = {
        let mut slots = state.slots.lock().await;
        let _ = slots.release(&cancelled.spot_id, 1);
        slots.available(&cancelled.spot_id)
    };
    state
        .spots
        .set_available_slots(cancelled.spot_id, remaining)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let _ = state.events_tx.send(DomainEvent::BookingCancelled(BookingCancelledEvent {
        booking_id: cancelled.id,
        spot_id: cancelled.spot_id,
        customer_id: claims.sub,
        timestamp: Utc::now().timestamp(),
    }));

    info!(booking_id = %cancelled.id, "Booking cancelled");

    Ok(Json(cancelled))
}

fn booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::NotFound(_) => AppError::NotFoundError(err.to_string()),
        BookingError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
        BookingError::InvalidWindow => AppError::ValidationError(err.to_string()),
    }
}

fn payment_error(err: PaymentError) -> AppError {
    match err {
        PaymentError::Declined => AppError::PaymentDeclined(err.to_string()),
        PaymentError::NotFound(_) => AppError::NotFoundError(err.to_string()),
        other => AppError::ValidationError(other.to_string()),
    }
}
