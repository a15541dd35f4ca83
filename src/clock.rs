use chrono::{DateTime, Duration, Months, Utc};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One calendar month after `from`. Falls back to 30 days when the month
/// arithmetic overflows.
pub(crate) fn one_month_after(from: i64) -> i64 {
    DateTime::<Utc>::from_timestamp_millis(from)
        .and_then(|at| at.checked_add_months(Months::new(1)))
        .map_or(from + Duration::days(30).num_milliseconds(), |at| {
            at.timestamp_millis()
        })
}
