use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub spot_id: Uuid,
    pub customer_id: String,
    pub total_price: f64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub spot_id: Uuid,
    pub customer_id: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct PaymentCapturedEvent {
    pub payment_id: String,
    pub customer_id: String,
    pub amount: f64,
    pub currency: String,
    pub timestamp: i64,
}

/// Envelope broadcast to live subscribers (the API's SSE stream).
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    BookingConfirmed(BookingConfirmedEvent),
    BookingCancelled(BookingCancelledEvent),
    PaymentCaptured(PaymentCapturedEvent),
}
