//! Site metric counter snapshots.

use serde::{Deserialize, Serialize};

/// One counter snapshot (page views or active users). Only the most recent
/// snapshot is retained per metric; snapshots are scalar and never filtered
/// by date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub date: String,
    pub count: i64,
}
