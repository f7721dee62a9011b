//! Time-series alignment: "as-of" lookups over sparse, ascending series.
//!
//! Prices, exchange rates and held quantities are all sampled independently.
//! Every alignment site resolves the latest sample at or before the query
//! instant (forward fill) instead of assuming synchronized timestamps.

use chrono::{DateTime, Utc};

/// Anything carrying the instant it was observed at.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Returns the latest entry of `series` whose timestamp is `<= at`.
///
/// `series` must be sorted ascending by timestamp; this is not checked.
/// Returns `None` for an empty series or when every entry is after `at`.
pub fn as_of<T: Timestamped>(series: &[T], at: DateTime<Utc>) -> Option<&T> {
    let idx = series.partition_point(|item| item.timestamp() <= at);
    if idx == 0 {
        None
    } else {
        series.get(idx - 1)
    }
}

/// Number of leading entries of `series` with a timestamp `<= at`.
pub fn count_until<T: Timestamped>(series: &[T], at: DateTime<Utc>) -> usize {
    series.partition_point(|item| item.timestamp() <= at)
}

/// Number of leading entries of `series` with a timestamp strictly before `at`.
pub fn count_before<T: Timestamped>(series: &[T], at: DateTime<Utc>) -> usize {
    series.partition_point(|item| item.timestamp() < at)
}

/// Timestamp of the first entry, if any.
pub fn first_timestamp<T: Timestamped>(series: &[T]) -> Option<DateTime<Utc>> {
    series.first().map(Timestamped::timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, PartialEq)]
    struct Sample {
        at: DateTime<Utc>,
        value: i32,
    }

    impl Timestamped for Sample {
        fn timestamp(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    fn series() -> Vec<Sample> {
        vec![
            Sample { at: base(), value: 1 },
            Sample { at: base() + Duration::days(2), value: 2 },
            Sample { at: base() + Duration::days(5), value: 3 },
        ]
    }

    #[test]
    fn test_empty_series_returns_none() {
        let empty: Vec<Sample> = Vec::new();
        assert!(as_of(&empty, base()).is_none());
    }

    #[test]
    fn test_query_before_first_entry_returns_none() {
        assert!(as_of(&series(), base() - Duration::seconds(1)).is_none());
    }

    #[test]
    fn test_exact_match_returns_that_entry() {
        let s = series();
        assert_eq!(as_of(&s, base() + Duration::days(2)).unwrap().value, 2);
    }

    #[test]
    fn test_between_entries_forward_fills() {
        let s = series();
        assert_eq!(as_of(&s, base() + Duration::days(4)).unwrap().value, 2);
        assert_eq!(as_of(&s, base() + Duration::days(400)).unwrap().value, 3);
    }

    #[test]
    fn test_count_until() {
        let s = series();
        assert_eq!(count_until(&s, base() - Duration::days(1)), 0);
        assert_eq!(count_until(&s, base() + Duration::days(2)), 2);
        assert_eq!(count_until(&s, base() + Duration::days(9)), 3);
    }

    #[test]
    fn test_count_before_excludes_entries_at_the_instant() {
        let s = series();
        assert_eq!(count_before(&s, base()), 0);
        assert_eq!(count_before(&s, base() + Duration::days(2)), 1);
        assert_eq!(count_before(&s, base() + Duration::days(9)), 3);
    }
}
