//! Customer records with subscription state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription state as stored. Unknown store values are preserved rather
/// than failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Subscribed,
    Unsubscribed,
    Other(String),
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Subscribed" => Self::Subscribed,
            "Unsubscribed" => Self::Unsubscribed,
            _ => Self::Other(value),
        }
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Subscribed => "Subscribed".to_string(),
            SubscriptionStatus::Unsubscribed => "Unsubscribed".to_string(),
            SubscriptionStatus::Other(value) => value,
        }
    }
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Subscribed => "Subscribed",
            Self::Unsubscribed => "Unsubscribed",
            Self::Other(value) => value,
        }
    }
}

/// Customer row as the store returns it, ordered by purchase date
/// descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub subscription_status: SubscriptionStatus,
    /// Purchase timestamp as stored; may be missing or unparsable, in which
    /// case the record is excluded from date-filtered views only.
    pub purchase_date: Option<String>,
    pub total_revenue: Decimal,
}

impl Customer {
    /// Calendar day of the purchase, if present and parsable.
    pub fn purchase_day(&self) -> Option<NaiveDate> {
        self.purchase_date
            .as_deref()
            .and_then(super::parse_stored_date)
    }
}
