//! Domain models and DTOs for the dashboard entities.

pub mod customer;
pub mod metrics;
pub mod sales;
pub mod session;

use chrono::NaiveDate;

/// Lenient parse of a calendar date as the store returns it.
///
/// The store serves plain dates (`2024-01-05`) for sales rows and full
/// timestamps (`2024-01-05T09:30:00+00:00`) for purchase dates; both reduce
/// to the calendar day. Returns `None` for anything unparsable — the filter
/// boundary excludes such records instead of erroring (records keep their
/// raw date text until then).
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|datetime| datetime.date())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates() {
        assert_eq!(
            parse_stored_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        assert_eq!(
            parse_stored_date("2024-01-05T09:30:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_stored_date("2024-01-05T23:59:59.123456Z"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn parses_offsetless_timestamps() {
        assert_eq!(
            parse_stored_date("2024-01-05T09:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_stored_date("not-a-date"), None);
        assert_eq!(parse_stored_date(""), None);
        assert_eq!(parse_stored_date("2024-13-45"), None);
    }
}
