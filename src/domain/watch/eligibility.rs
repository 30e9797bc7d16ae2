//! Watch-window eligibility rules

use chrono::{DateTime, Duration, Utc};

use crate::shared::types::PurchaseRecord;

/// Length of the price-watch window in calendar days
pub const WATCH_WINDOW_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// End of the watch window for a purchase made at `purchase_date`
pub fn expires_at(purchase_date: DateTime<Utc>) -> DateTime<Utc> {
    purchase_date + Duration::days(WATCH_WINDOW_DAYS)
}

/// A record is eligible while it is watched and its window has not closed.
/// The boundary counts as in-window: `expires_at == now` is still eligible.
pub fn is_eligible(record: &PurchaseRecord, now: DateTime<Utc>) -> bool {
    record.watched && expires_at(record.purchase_date) >= now
}

/// Whole days remaining in the watch window, rounded up, never negative
pub fn days_left(record: &PurchaseRecord, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (expires_at(record.purchase_date) - now).num_milliseconds();
    if remaining_ms <= 0 {
        0
    } else {
        (remaining_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}

/// Persistence-level pre-filter cutoff: `purchase_date >= coarse_cutoff(now)`
/// approximates eligibility and agrees with [`is_eligible`] at the boundary.
pub fn coarse_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WATCH_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_purchased_at(purchase_date: DateTime<Utc>, watched: bool) -> PurchaseRecord {
        PurchaseRecord::new("user-1", "1234567", None, 100.0, purchase_date, watched)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_eligible_inside_window() {
        let record = record_purchased_at(now() - Duration::days(10), true);
        assert!(is_eligible(&record, now()));
        assert_eq!(days_left(&record, now()), 20);
    }

    #[test]
    fn test_boundary_exactly_30_days_is_still_eligible() {
        let record = record_purchased_at(now() - Duration::days(30), true);
        assert!(is_eligible(&record, now()));
        assert_eq!(days_left(&record, now()), 0);
        // coarse pre-filter agrees at the boundary
        assert!(record.purchase_date >= coarse_cutoff(now()));
    }

    #[test]
    fn test_boundary_31_days_is_expired() {
        let record = record_purchased_at(now() - Duration::days(31), true);
        assert!(!is_eligible(&record, now()));
        assert_eq!(days_left(&record, now()), 0);
        assert!(record.purchase_date < coarse_cutoff(now()));
    }

    #[test]
    fn test_unwatched_record_is_never_eligible() {
        let record = record_purchased_at(now() - Duration::days(1), false);
        assert!(!is_eligible(&record, now()));
    }

    #[test]
    fn test_days_left_rounds_up_partial_days() {
        let record = record_purchased_at(now() - Duration::days(29) - Duration::hours(1), true);
        // 23 hours left in the window still counts as one day
        assert_eq!(days_left(&record, now()), 1);
    }

    #[test]
    fn test_days_left_never_negative() {
        let record = record_purchased_at(now() - Duration::days(365), true);
        assert_eq!(days_left(&record, now()), 0);
    }
}
