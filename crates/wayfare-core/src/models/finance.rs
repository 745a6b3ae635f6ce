//! Admin dashboard counters and finance ledger.

use serde::{Deserialize, Serialize};

use super::Id;
use crate::envelope::Pagination;

/// Dashboard counters as the downstream reports them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    #[serde(default)]
    total_users: Option<u64>,
    #[serde(default)]
    total_hosts: Option<u64>,
    #[serde(default)]
    total_experiences: Option<u64>,
    #[serde(default)]
    pending_experiences: Option<u64>,
    #[serde(default)]
    total_bookings: Option<u64>,
    #[serde(default, deserialize_with = "super::decimal::deserialize_opt")]
    total_revenue: Option<f64>,
}

/// Outbound dashboard counters, zero when unreported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered users.
    pub total_users: u64,
    /// Users with the host role.
    pub total_hosts: u64,
    /// Experiences in any status.
    pub total_experiences: u64,
    /// Experiences awaiting moderation.
    pub pending_experiences: u64,
    /// Bookings in any status.
    pub total_bookings: u64,
    /// Gross revenue.
    pub total_revenue: f64,
}

impl From<StatsRecord> for DashboardStats {
    fn from(record: StatsRecord) -> Self {
        Self {
            total_users: record.total_users.unwrap_or(0),
            total_hosts: record.total_hosts.unwrap_or(0),
            total_experiences: record.total_experiences.unwrap_or(0),
            pending_experiences: record.pending_experiences.unwrap_or(0),
            total_bookings: record.total_bookings.unwrap_or(0),
            total_revenue: record.total_revenue.unwrap_or(0.0),
        }
    }
}

/// A ledger entry as the downstream stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Record key.
    pub id: Id,
    /// Booking the entry belongs to.
    #[serde(default)]
    pub booking_id: Option<Id>,
    /// Amount in `currency`.
    #[serde(deserialize_with = "super::decimal::deserialize")]
    pub amount: f64,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Entry kind (`payment`, `refund`, `payout`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Settlement status.
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Downstream reply of `GET /api/admin/finance/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionList {
    /// Entries on this page.
    pub transactions: Vec<TransactionRecord>,
    /// Paging information.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Outbound ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Record key.
    pub id: Id,
    /// Booking the entry belongs to.
    pub booking_id: Option<Id>,
    /// Amount.
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Settlement status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            booking_id: record.booking_id,
            amount: record.amount,
            currency: record.currency.unwrap_or_else(|| "USD".to_string()),
            kind: record.kind.unwrap_or_else(|| "payment".to_string()),
            status: record.status.unwrap_or_else(|| "completed".to_string()),
            created_at: record.created_at,
        }
    }
}
