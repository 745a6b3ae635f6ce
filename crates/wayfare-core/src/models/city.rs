//! Cities.

use serde::{Deserialize, Serialize};

use super::Id;
use crate::media::MediaBase;
use crate::slug::slugify;

/// Emoji shown for a city the downstream has no emoji for.
pub const DEFAULT_CITY_EMOJI: &str = "🏙️";

/// A city as the downstream stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    /// Record key.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Country name.
    #[serde(default)]
    pub country: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Stored cover image path.
    #[serde(default)]
    pub image: Option<String>,
    /// Display emoji.
    #[serde(default)]
    pub emoji: Option<String>,
    /// Number of published experiences.
    #[serde(default)]
    pub experience_count: Option<u32>,
    /// Whether the city is featured.
    #[serde(default)]
    pub is_popular: Option<bool>,
}

/// Downstream reply of `GET /api/cities`.
#[derive(Debug, Clone, Deserialize)]
pub struct CityList {
    /// The cities.
    pub cities: Vec<CityRecord>,
}

/// Downstream reply of `GET /api/cities/slug/:slug`.
#[derive(Debug, Clone, Deserialize)]
pub struct CityDetail {
    /// The city.
    pub city: CityRecord,
}

/// Outbound city with every display field filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Record key.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// URL slug, derived from the name when the downstream has none.
    pub slug: String,
    /// Display emoji.
    pub emoji: String,
    /// Country name, empty when unknown.
    pub country: String,
    /// Short description, empty when unknown.
    pub description: String,
    /// Absolute cover image URL.
    pub image: Option<String>,
    /// Number of published experiences.
    pub experience_count: u32,
    /// Whether the city is featured.
    pub is_popular: bool,
}

impl City {
    /// Map a downstream record, filling defaults.
    #[must_use]
    pub fn from_record(record: CityRecord, media: &MediaBase) -> Self {
        let slug = record
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&record.name));
        let emoji = record
            .emoji
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CITY_EMOJI.to_string());

        Self {
            id: record.id,
            slug,
            emoji,
            country: record.country.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            image: media.resolve_opt(record.image.as_deref()),
            experience_count: record.experience_count.unwrap_or(0),
            is_popular: record.is_popular.unwrap_or(false),
            name: record.name,
        }
    }
}
