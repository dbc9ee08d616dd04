use chrono::{DateTime, Duration, Utc};
use parkeasy_catalog::spot::{ParkingSpot, PriceUnit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Active,
    Expired,
    Accepted,
    Cancelled,
}

/// A priced offer for one spot over one time window. Ephemeral: it exists to
/// be accepted into a booking before its hold runs out, and is never
/// persisted beyond the in-memory book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub spot_name: String,
    pub customer_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_unit: PriceUnit,
    pub base_price: f64,
    pub total: f64,
    pub currency: String,
    pub status: QuoteStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        spot: &ParkingSpot,
        customer_id: Option<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        total: f64,
        hold: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            spot_id: spot.id,
            spot_name: spot.name.clone(),
            customer_id,
            start_time,
            end_time,
            price_unit: spot.price_unit,
            base_price: spot.price,
            total,
            currency: "INR".to_string(),
            status: QuoteStatus::Active,
            expires_at: now + hold,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.status == QuoteStatus::Active && !self.is_expired()
    }
}
