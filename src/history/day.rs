use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Normalizes a date-picker value to the calendar day it names.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (the day is taken in the value's own offset)
/// and naive `YYYY-MM-DDTHH:MM[:SS]`. Empty input means "no filter".
pub fn normalize_day(input: &str) -> Result<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(Some(d));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.date_naive()));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(Some(dt.date()));
        }
    }
    Err(anyhow!("unrecognized date {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn empty_means_no_filter() {
        assert_eq!(normalize_day("").unwrap(), None);
        assert_eq!(normalize_day("   ").unwrap(), None);
    }

    #[test]
    fn time_of_day_does_not_move_the_day() {
        assert_eq!(normalize_day("2024-03-02").unwrap(), day(2024, 3, 2));
        assert_eq!(normalize_day("2024-03-02T00:00:00Z").unwrap(), day(2024, 3, 2));
        assert_eq!(normalize_day("2024-03-02T23:59:59-03:00").unwrap(), day(2024, 3, 2));
        assert_eq!(normalize_day("2024-03-02T00:30:00+09:00").unwrap(), day(2024, 3, 2));
        assert_eq!(normalize_day("2024-03-02T18:45").unwrap(), day(2024, 3, 2));
        assert_eq!(normalize_day("2024-03-02T18:45:10.250").unwrap(), day(2024, 3, 2));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(normalize_day("yesterday").is_err());
        assert!(normalize_day("2024-13-40").is_err());
    }
}
