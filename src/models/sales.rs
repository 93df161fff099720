//! Daily sales revenue records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of sales revenue as the store returns it, ordered by date
/// ascending. Immutable once fetched; replaced wholesale on the next cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar date as stored. Kept raw so an unparsable date survives the
    /// fetch and is only dropped from the filtered view.
    pub date: String,
    pub amount: Decimal,
}

impl SalesRecord {
    /// Calendar day of this record, if the stored date parses.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        super::parse_stored_date(&self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn deserializes_store_row() {
        let record: SalesRecord =
            serde_json::from_str(r#"{"date": "2024-01-05", "amount": 1250.75}"#).unwrap();
        assert_eq!(record.date, "2024-01-05");
        assert_eq!(record.amount, Decimal::from_f64(1250.75).unwrap());
        assert_eq!(
            record.calendar_date(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn unparsable_date_survives_deserialization() {
        let record: SalesRecord =
            serde_json::from_str(r#"{"date": "garbled", "amount": 10.0}"#).unwrap();
        assert_eq!(record.calendar_date(), None);
    }
}
