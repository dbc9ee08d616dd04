use chrono::{DateTime, Duration, Utc};
use parkeasy_catalog::filter::{FilterCriteria, FilterEngine};
use parkeasy_catalog::pricing::calculate_price_for_unit;
use parkeasy_catalog::spot::ParkingSpot;

use crate::models::Quote;

/// Generates priced quotes: the filter engine narrows the candidate set, the
/// price calculator bills the requested window per spot.
pub struct QuoteGenerator {
    engine: FilterEngine,
    hold: Duration,
}

impl QuoteGenerator {
    pub fn new(engine: FilterEngine, hold_seconds: u64) -> Self {
        Self {
            engine,
            hold: Duration::seconds(hold_seconds as i64),
        }
    }

    /// One quote per spot surviving the criteria, in catalog order.
    /// Inverted windows are rejected here; the price calculator itself does
    /// not guard them.
    pub fn generate_quotes(
        &self,
        spots: &[ParkingSpot],
        criteria: &FilterCriteria,
        customer_id: Option<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<Quote>, QuoteError> {
        if end_time < start_time {
            return Err(QuoteError::InvalidWindow);
        }

        let quotes = self
            .engine
            .apply(spots, criteria)
            .into_iter()
            .map(|spot| {
                let total =
                    calculate_price_for_unit(spot.price, spot.price_unit, start_time, end_time);
                Quote::new(&spot, customer_id.clone(), start_time, end_time, total, self.hold)
            })
            .collect();

        Ok(quotes)
    }

    /// Price a single spot for a window
    pub fn quote_spot(
        &self,
        spot: &ParkingSpot,
        customer_id: Option<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Quote, QuoteError> {
        if end_time < start_time {
            return Err(QuoteError::InvalidWindow);
        }
        if !spot.available {
            return Err(QuoteError::SpotUnavailable(spot.id.to_string()));
        }

        let total = calculate_price_for_unit(spot.price, spot.price_unit, start_time, end_time);
        Ok(Quote::new(spot, customer_id, start_time, end_time, total, self.hold))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Booking window ends before it starts")]
    InvalidWindow,

    #[error("Spot is not available: {0}")]
    SpotUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parkeasy_catalog::spot::{LocationType, PriceUnit};
    use uuid::Uuid;

    fn spot(price: f64, unit: PriceUnit) -> ParkingSpot {
        ParkingSpot {
            id: Uuid::new_v4(),
            name: "Downtown Secure Parking".to_string(),
            address: "Hitech City, Hyderabad".to_string(),
            description: None,
            images: vec![],
            price,
            price_unit: unit,
            rating: 4.5,
            reviews: 20,
            distance_km: Some(1.2),
            features: vec!["CCTV Surveillance".to_string()],
            location_type: Some(LocationType::Commercial),
            available: true,
            total_slots: 10,
            available_slots: 8,
            is_popular: true,
            owner_id: None,
        }
    }

    fn generator() -> QuoteGenerator {
        QuoteGenerator::new(FilterEngine::default(), 900)
    }

    #[test]
    fn test_quote_bills_rounded_up_hours() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 11, 30, 0).unwrap();

        let quote = generator()
            .quote_spot(&spot(80.0, PriceUnit::Hour), None, start, end)
            .unwrap();

        // ceil(1.5h) = 2 billed hours
        assert_eq!(quote.total, 160.0);
        assert_eq!(quote.currency, "INR");
        assert!(quote.is_active());
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let result = generator().quote_spot(&spot(80.0, PriceUnit::Hour), None, start, end);
        assert!(matches!(result, Err(QuoteError::InvalidWindow)));
    }

    #[test]
    fn test_unavailable_spot_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();

        let mut unavailable = spot(80.0, PriceUnit::Hour);
        unavailable.available = false;

        let result = generator().quote_spot(&unavailable, None, start, end);
        assert!(matches!(result, Err(QuoteError::SpotUnavailable(_))));
    }

    #[test]
    fn test_generate_quotes_filters_then_prices() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let cheap = spot(40.0, PriceUnit::Hour);
        let pricey = spot(200.0, PriceUnit::Hour);
        let criteria = FilterCriteria {
            price_range: Some((0.0, 100.0)),
            ..Default::default()
        };

        let quotes = generator()
            .generate_quotes(&[cheap.clone(), pricey], &criteria, None, start, end)
            .unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].spot_id, cheap.id);
        assert_eq!(quotes[0].total, 80.0);
    }
}
