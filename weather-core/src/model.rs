use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Outcome of announcing one category to its subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub category: Category,
    pub notified: usize,
    pub dispatched_at: DateTime<Utc>,
}
