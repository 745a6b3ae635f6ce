//! Experiences (bookable activities hosted in a city).

use serde::{Deserialize, Serialize};

use super::Id;
use crate::envelope::Pagination;
use crate::media::MediaBase;
use crate::slug::slugify;

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_STATUS: &str = "pending";

/// City reference embedded in an experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRef {
    /// City key.
    pub id: Id,
    /// City name.
    pub name: String,
    /// City slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Host reference embedded in an experience.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRecord {
    /// Host user key.
    pub id: Id,
    /// Host display name.
    pub name: String,
    /// Stored avatar path.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// An experience as the downstream stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRecord {
    /// Record key.
    pub id: Id,
    /// Title.
    pub title: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Embedded city, when the downstream joins it.
    #[serde(default)]
    pub city: Option<CityRef>,
    /// City key, when the city is not joined.
    #[serde(default)]
    pub city_id: Option<Id>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Price per guest.
    #[serde(default, deserialize_with = "super::decimal::deserialize_opt")]
    pub price: Option<f64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Duration in hours.
    #[serde(default, deserialize_with = "super::decimal::deserialize_opt")]
    pub duration_hours: Option<f64>,
    /// Guest cap.
    #[serde(default)]
    pub max_guests: Option<u32>,
    /// Stored image paths.
    #[serde(default)]
    pub images: Vec<String>,
    /// Moderation status (`pending`, `approved`, `rejected`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Hosting user.
    #[serde(default)]
    pub host: Option<HostRecord>,
    /// Average rating.
    #[serde(default, deserialize_with = "super::decimal::deserialize_opt")]
    pub rating: Option<f64>,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Downstream reply of experience listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceList {
    /// The experiences on this page.
    pub experiences: Vec<ExperienceRecord>,
    /// Paging information.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Downstream reply of single-experience endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceDetail {
    /// The experience.
    pub experience: ExperienceRecord,
}

/// Outbound host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Host {
    /// Host user key.
    pub id: Id,
    /// Host display name.
    pub name: String,
    /// Absolute avatar URL.
    pub avatar: Option<String>,
}

/// Outbound experience.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Record key.
    pub id: Id,
    /// Title.
    pub title: String,
    /// URL slug, derived from the title when the downstream has none.
    pub slug: String,
    /// Description, empty when unknown.
    pub description: String,
    /// City reference.
    pub city: Option<CityRef>,
    /// City key.
    pub city_id: Option<Id>,
    /// Category.
    pub category: Option<String>,
    /// Price per guest, `0` when unknown.
    pub price: f64,
    /// ISO currency code.
    pub currency: String,
    /// Duration in hours.
    pub duration_hours: Option<f64>,
    /// Guest cap.
    pub max_guests: Option<u32>,
    /// Absolute image URLs.
    pub images: Vec<String>,
    /// First image, used as the card cover.
    pub cover_image: Option<String>,
    /// Moderation status.
    pub status: String,
    /// Host.
    pub host: Option<Host>,
    /// Average rating, `0` when unrated.
    pub rating: f64,
    /// Number of reviews.
    pub review_count: u32,
    /// Creation timestamp as the downstream formats it.
    pub created_at: Option<String>,
}

impl Experience {
    /// Map a downstream record, filling defaults and resolving images.
    #[must_use]
    pub fn from_record(record: ExperienceRecord, media: &MediaBase) -> Self {
        let images: Vec<String> = record
            .images
            .iter()
            .filter_map(|path| media.resolve_opt(Some(path)))
            .collect();
        let slug = record
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&record.title));
        let city_id = record
            .city_id
            .or_else(|| record.city.as_ref().map(|c| c.id.clone()));

        Self {
            id: record.id,
            slug,
            description: record.description.unwrap_or_default(),
            city: record.city,
            city_id,
            category: record.category,
            price: record.price.unwrap_or(0.0),
            currency: record
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            duration_hours: record.duration_hours,
            max_guests: record.max_guests,
            cover_image: images.first().cloned(),
            images,
            status: record.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            host: record.host.map(|host| Host {
                id: host.id,
                name: host.name,
                avatar: media.resolve_opt(host.avatar.as_deref()),
            }),
            rating: record.rating.unwrap_or(0.0),
            review_count: record.review_count.unwrap_or(0),
            created_at: record.created_at,
            title: record.title,
        }
    }
}
