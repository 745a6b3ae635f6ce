//! Bookings.

use serde::{Deserialize, Serialize};

use super::Id;
use crate::envelope::Pagination;

/// A booking as the downstream stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// Record key.
    pub id: Id,
    /// Booked experience.
    pub experience_id: Id,
    /// Title of the booked experience, when joined.
    #[serde(default)]
    pub experience_title: Option<String>,
    /// Booked date (`YYYY-MM-DD`).
    pub date: String,
    /// Number of guests.
    pub guests: u32,
    /// Total charged.
    #[serde(default, deserialize_with = "super::decimal::deserialize_opt")]
    pub total_price: Option<f64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Booking status.
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Downstream reply of `GET /api/bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingList {
    /// Bookings on this page.
    pub bookings: Vec<BookingRecord>,
    /// Paging information.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Downstream reply of single-booking endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingDetail {
    /// The booking.
    pub booking: BookingRecord,
}

/// Outbound booking. Fields mirror [`BookingRecord`] with defaults filled.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Id,
    pub experience_id: Id,
    pub experience_title: Option<String>,
    pub date: String,
    pub guests: u32,
    pub total_price: f64,
    pub currency: String,
    pub status: String,
    pub created_at: Option<String>,
}

impl From<BookingRecord> for Booking {
    fn from(record: BookingRecord) -> Self {
        Self {
            id: record.id,
            experience_id: record.experience_id,
            experience_title: record.experience_title,
            date: record.date,
            guests: record.guests,
            total_price: record.total_price.unwrap_or(0.0),
            currency: record.currency.unwrap_or_else(|| "USD".to_string()),
            status: record.status.unwrap_or_else(|| "pending".to_string()),
            created_at: record.created_at,
        }
    }
}
