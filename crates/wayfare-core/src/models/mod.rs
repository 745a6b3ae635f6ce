//! Downstream schemas and their outbound mappings.
//!
//! Each downstream endpoint has a declared reply type (`*Record`, `*List`,
//! `*Detail`) and an explicit mapping into the outbound representation.
//! Replies that do not match the declared shape fail to decode instead of
//! passing through.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod booking;
pub mod city;
mod decimal;
pub mod experience;
pub mod finance;
pub mod user;

pub use booking::{Booking, BookingDetail, BookingList, BookingRecord};
pub use city::{City, CityDetail, CityList, CityRecord, DEFAULT_CITY_EMOJI};
pub use experience::{Experience, ExperienceDetail, ExperienceList, ExperienceRecord};
pub use finance::{DashboardStats, StatsRecord, Transaction, TransactionList, TransactionRecord};
pub use user::{Session, SessionRecord, User, UserDetail, UserList, UserRecord};

/// A downstream record identifier.
///
/// The downstream mixes numeric and string keys; both are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric key.
    Int(i64),
    /// String key (UUID, slug, ...).
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}
