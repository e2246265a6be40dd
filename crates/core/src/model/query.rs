//! Filters for list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EmployeeId, OrderStatus};

/// Default page size for list operations.
pub const DEFAULT_LIMIT: usize = 50;

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Filter for `get_transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Filter for `get_orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            start: None,
            end: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Filter for `get_employee_shifts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQuery {
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Whether `at` falls within the optional `[start, end]` window.
#[must_use]
pub fn within_range(
    at: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.is_none_or(|s| at >= s) && end.is_none_or(|e| at <= e)
}
