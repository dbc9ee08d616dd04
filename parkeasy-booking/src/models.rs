use chrono::{DateTime, Utc};
use parkeasy_catalog::spot::{ParkingSpot, PriceUnit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Pending,
    Paid,
    Refunded,
}

/// Vehicle snapshot frozen onto the booking at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub license_plate: String,
}

/// The single source of truth for a customer's reservation. Spot name and
/// address are snapshotted so the record survives catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub spot_name: String,
    pub spot_address: String,
    pub customer_id: String,
    pub vehicle: VehicleInfo,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_unit: PriceUnit,
    pub total_price: f64,
    pub currency: String,
    pub status: BookingStatus,
    pub payment_state: PaymentState,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        spot: &ParkingSpot,
        customer_id: String,
        vehicle: VehicleInfo,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        total_price: f64,
        payment_method: String,
        payment_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            spot_id: spot.id,
            spot_name: spot.name.clone(),
            spot_address: spot.address.clone(),
            customer_id,
            vehicle,
            start_time,
            end_time,
            price_unit: spot.price_unit,
            total_price,
            currency: "INR".to_string(),
            status: BookingStatus::Upcoming,
            payment_state: PaymentState::Paid,
            payment_method,
            payment_id,
            qr_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update booking status
    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}
