use chrono::{DateTime, Datelike, Utc};

use crate::spot::PriceUnit;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Total charge for booking a window at the listed rate.
///
/// Hourly and daily rates bill the rounded-up unit count (any started hour or
/// day is paid in full); monthly rates bill calendar-month boundaries crossed,
/// floored at one month, ignoring day-of-month entirely. An unrecognized unit
/// bills the base rate unchanged.
///
/// No window validation happens here: `end < start` yields a zero or negative
/// charge under the ceiling, and callers that need `start <= end` enforce it
/// upstream.
pub fn calculate_price(
    base_price: f64,
    unit: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    match PriceUnit::parse(unit) {
        Some(unit) => calculate_price_for_unit(base_price, unit, start, end),
        None => base_price,
    }
}

/// Same algorithm for callers already holding the parsed unit.
pub fn calculate_price_for_unit(
    base_price: f64,
    unit: PriceUnit,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    let duration_hours = (end - start).num_milliseconds() as f64 / MS_PER_HOUR;

    match unit {
        PriceUnit::Hour => duration_hours.ceil() * base_price,
        PriceUnit::Day => (duration_hours / 24.0).ceil() * base_price,
        PriceUnit::Month => {
            let months = (end.year() - start.year()) * 12
                + (end.month() as i32 - start.month() as i32);
            // A monthly booking always bills at least one month
            f64::from(months.max(1)) * base_price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_zero_duration_hourly_is_free() {
        let t = at(2024, 6, 1, 10, 0);
        assert_eq!(calculate_price(100.0, "hour", t, t), 0.0);
    }

    #[test]
    fn test_partial_hours_round_up() {
        let start = at(2024, 6, 1, 10, 0);
        let end = at(2024, 6, 1, 11, 30); // 90 minutes
        assert_eq!(calculate_price(100.0, "hour", start, end), 200.0);
    }

    #[test]
    fn test_exact_hours_are_not_padded() {
        let start = at(2024, 6, 1, 10, 0);
        let end = at(2024, 6, 1, 12, 0);
        assert_eq!(calculate_price(80.0, "hour", start, end), 160.0);
    }

    #[test]
    fn test_partial_days_round_up() {
        let start = at(2024, 6, 1, 10, 0);
        let end = at(2024, 6, 2, 11, 0); // 25 hours
        assert_eq!(calculate_price(500.0, "day", start, end), 1000.0);
    }

    #[test]
    fn test_monthly_floors_at_one_month() {
        // Jan 15 → Feb 1 crosses one month boundary: one billed month
        let start = at(2024, 1, 15, 0, 0);
        let end = at(2024, 2, 1, 0, 0);
        assert_eq!(calculate_price(3000.0, "month", start, end), 3000.0);

        // Same month, even same instant, still bills the minimum month
        let t = at(2024, 3, 10, 9, 0);
        assert_eq!(calculate_price(3000.0, "month", t, t), 3000.0);
    }

    #[test]
    fn test_monthly_ignores_day_of_month() {
        // Jan 31 → Feb 1 bills identically to Jan 1 → Jan 31
        let a = calculate_price(2500.0, "month", at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0));
        let b = calculate_price(2500.0, "month", at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0));
        assert_eq!(a, 2500.0);
        assert_eq!(b, 2500.0);
    }

    #[test]
    fn test_monthly_spans_year_boundaries() {
        let start = at(2023, 11, 5, 0, 0);
        let end = at(2024, 2, 5, 0, 0);
        assert_eq!(calculate_price(2000.0, "month", start, end), 6000.0);
    }

    #[test]
    fn test_unrecognized_unit_bills_base_price() {
        let start = at(2024, 6, 1, 10, 0);
        let end = at(2024, 6, 1, 11, 0);
        assert_eq!(calculate_price(100.0, "xyz", start, end), 100.0);
    }

    #[test]
    fn test_typed_entry_point_matches_string_entry_point() {
        let start = at(2024, 6, 1, 10, 0);
        let end = at(2024, 6, 1, 11, 30);
        assert_eq!(
            calculate_price_for_unit(100.0, PriceUnit::Hour, start, end),
            calculate_price(100.0, "hour", start, end)
        );
    }

    #[test]
    fn test_negative_duration_is_not_guarded() {
        // Callers validate windows; the calculator just applies the ceiling,
        // which for a negative duration is at most zero.
        let start = at(2024, 6, 1, 12, 0);
        let end = at(2024, 6, 1, 10, 0);
        assert!(calculate_price(100.0, "hour", start, end) <= 0.0);
    }
}
