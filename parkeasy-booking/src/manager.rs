use chrono::{DateTime, Utc};
use parkeasy_catalog::pricing::calculate_price_for_unit;
use parkeasy_catalog::spot::ParkingSpot;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, PaymentState, VehicleInfo};

/// Manages booking lifecycle and state transitions
pub struct BookingManager {
    bookings: HashMap<Uuid, Booking>,
}

impl BookingManager {
    pub fn new() -> Self {
        Self {
            bookings: HashMap::new(),
        }
    }

    /// Create a booking for a spot and window. The total comes from the
    /// price calculator unless the caller already holds a quoted total
    /// (quote acceptance wins over recomputation). Inverted windows are
    /// rejected here, not in the calculator.
    pub fn create_booking(
        &mut self,
        spot: &ParkingSpot,
        customer_id: String,
        vehicle: VehicleInfo,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        payment_method: String,
        payment_id: Option<String>,
        total_override: Option<f64>,
    ) -> Result<Booking, BookingError> {
        if end_time < start_time {
            return Err(BookingError::InvalidWindow);
        }

        let total = total_override.unwrap_or_else(|| {
            calculate_price_for_unit(spot.price, spot.price_unit, start_time, end_time)
        });

        let booking = Booking::new(
            spot,
            customer_id,
            vehicle,
            start_time,
            end_time,
            total,
            payment_method,
            payment_id,
        );

        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    pub fn get_booking(&self, booking_id: &Uuid) -> Option<&Booking> {
        self.bookings.get(booking_id)
    }

    /// A customer's bookings, newest first
    pub fn list_for_customer(&self, customer_id: &str) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    /// Attach the issued pass token to the booking record
    pub fn attach_pass(&mut self, booking_id: &Uuid, qr_code: String) -> Result<(), BookingError> {
        let booking = self.get_booking_mut(booking_id)?;
        booking.qr_code = Some(qr_code);
        Ok(())
    }

    /// Transition: Upcoming → Active (vehicle arrived)
    pub fn activate(&mut self, booking_id: &Uuid) -> Result<(), BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Upcoming {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "ACTIVE".to_string(),
            });
        }

        booking.update_status(BookingStatus::Active);
        Ok(())
    }

    /// Transition: Active → Completed (window ended, vehicle left)
    pub fn complete(&mut self, booking_id: &Uuid) -> Result<(), BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Active {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "COMPLETED".to_string(),
            });
        }

        booking.update_status(BookingStatus::Completed);
        Ok(())
    }

    /// Cancel an upcoming or active booking; a paid booking is refunded
    pub fn cancel(&mut self, booking_id: &Uuid) -> Result<Booking, BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if !matches!(booking.status, BookingStatus::Upcoming | BookingStatus::Active) {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "CANCELLED".to_string(),
            });
        }

        booking.update_status(BookingStatus::Cancelled);
        if booking.payment_state == PaymentState::Paid {
            booking.payment_state = PaymentState::Refunded;
        }

        Ok(booking.clone())
    }

    fn get_booking_mut(&mut self, booking_id: &Uuid) -> Result<&mut Booking, BookingError> {
        self.bookings
            .get_mut(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }
}

impl Default for BookingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Booking window ends before it starts")]
    InvalidWindow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parkeasy_catalog::spot::{LocationType, PriceUnit};

    fn spot() -> ParkingSpot {
        ParkingSpot {
            id: Uuid::new_v4(),
            name: "Downtown Secure Parking".to_string(),
            address: "Hitech City, Hyderabad".to_string(),
            description: None,
            images: vec![],
            price: 80.0,
            price_unit: PriceUnit::Hour,
            rating: 4.5,
            reviews: 124,
            distance_km: Some(1.2),
            features: vec!["CCTV Surveillance".to_string()],
            location_type: Some(LocationType::Commercial),
            available: true,
            total_slots: 24,
            available_slots: 11,
            is_popular: true,
            owner_id: None,
        }
    }

    fn vehicle() -> VehicleInfo {
        VehicleInfo {
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            license_plate: "MH-01-AB-1234".to_string(),
        }
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_booking_lifecycle() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        let booking = manager
            .create_booking(
                &spot(),
                "user_1".to_string(),
                vehicle(),
                start,
                end,
                "card".to_string(),
                Some("pay_test".to_string()),
                None,
            )
            .unwrap();
        let booking_id = booking.id;

        // Two billed hours at 80/hr
        assert_eq!(booking.total_price, 160.0);
        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.payment_state, PaymentState::Paid);

        // Upcoming → Active
        manager.activate(&booking_id).unwrap();
        assert_eq!(manager.get_booking(&booking_id).unwrap().status, BookingStatus::Active);

        // Active → Completed
        manager.complete(&booking_id).unwrap();
        assert_eq!(
            manager.get_booking(&booking_id).unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn test_invalid_transition() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        let booking = manager
            .create_booking(
                &spot(),
                "user_1".to_string(),
                vehicle(),
                start,
                end,
                "card".to_string(),
                None,
                None,
            )
            .unwrap();

        // Cannot complete a booking that never became active
        let result = manager.complete(&booking.id);
        assert!(matches!(result, Err(BookingError::InvalidTransition { .. })));
    }

    #[test]
    fn test_cancellation_refunds() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        let booking = manager
            .create_booking(
                &spot(),
                "user_1".to_string(),
                vehicle(),
                start,
                end,
                "upi".to_string(),
                None,
                None,
            )
            .unwrap();

        let cancelled = manager.cancel(&booking.id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment_state, PaymentState::Refunded);

        // Cancelled is terminal
        let again = manager.cancel(&booking.id);
        assert!(matches!(again, Err(BookingError::InvalidTransition { .. })));
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        let result = manager.create_booking(
            &spot(),
            "user_1".to_string(),
            vehicle(),
            end,
            start,
            "card".to_string(),
            None,
            None,
        );
        assert!(matches!(result, Err(BookingError::InvalidWindow)));
    }

    #[test]
    fn test_quoted_total_wins_over_recomputation() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        let booking = manager
            .create_booking(
                &spot(),
                "user_1".to_string(),
                vehicle(),
                start,
                end,
                "card".to_string(),
                None,
                Some(150.0),
            )
            .unwrap();
        assert_eq!(booking.total_price, 150.0);
    }

    #[test]
    fn test_list_for_customer_is_newest_first() {
        let mut manager = BookingManager::new();
        let (start, end) = window();

        for _ in 0..3 {
            manager
                .create_booking(
                    &spot(),
                    "user_1".to_string(),
                    vehicle(),
                    start,
                    end,
                    "card".to_string(),
                    None,
                    None,
                )
                .unwrap();
        }
        manager
            .create_booking(
                &spot(),
                "user_2".to_string(),
                vehicle(),
                start,
                end,
                "card".to_string(),
                None,
                None,
            )
            .unwrap();

        let mine = manager.list_for_customer("user_1");
        assert_eq!(mine.len(), 3);
        for pair in mine.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
