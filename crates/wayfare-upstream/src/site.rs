//! Page-level data fetching.
//!
//! Server-rendered pages fetch their data straight from the downstream
//! rather than through the gateway routes. Those fetches are the only place
//! the retry policy applies.

use futures::future::AbortRegistration;
use serde::de::DeserializeOwned;

use wayfare_core::models::{
    City, CityDetail, CityList, Experience, ExperienceDetail, ExperienceList,
};
use wayfare_core::{MediaBase, Pagination};

use crate::client::{Call, UpstreamClient};
use crate::error::Result;
use crate::retry::RetryPolicy;

/// A page of experiences.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperiencePage {
    /// Experiences on this page.
    pub experiences: Vec<Experience>,
    /// Paging information, when the downstream reports it.
    pub pagination: Option<Pagination>,
}

/// Typed, retrying client for page data.
#[derive(Debug, Clone)]
pub struct SiteClient {
    upstream: UpstreamClient,
    media: MediaBase,
    policy: RetryPolicy,
}

impl SiteClient {
    /// Create a page-data client with the default retry policy.
    #[must_use]
    pub fn new(upstream: UpstreamClient, media: MediaBase) -> Self {
        Self {
            upstream,
            media,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Featured cities for the home page.
    ///
    /// # Errors
    ///
    /// Returns the last downstream error once retries are exhausted.
    pub async fn popular_cities(&self, limit: u32) -> Result<Vec<City>> {
        let list: CityList = self
            .fetch(|upstream| {
                upstream
                    .get("/api/cities")
                    .query("limit", limit.to_string())
                    .query("popular", "true")
            })
            .await?;

        Ok(list
            .cities
            .into_iter()
            .map(|record| City::from_record(record, &self.media))
            .collect())
    }

    /// A city page, by slug.
    ///
    /// # Errors
    ///
    /// Returns `Status` with 404 (not retried) for an unknown slug.
    pub async fn city(&self, slug: &str) -> Result<City> {
        let detail: CityDetail = self
            .fetch(|upstream| upstream.get("/api/cities/slug").segment(slug))
            .await?;
        Ok(City::from_record(detail.city, &self.media))
    }

    /// One page of experiences, optionally restricted to a city.
    ///
    /// # Errors
    ///
    /// Returns the last downstream error once retries are exhausted.
    pub async fn experiences(&self, city_slug: Option<&str>, page: u32) -> Result<ExperiencePage> {
        let list: ExperienceList = self
            .fetch(|upstream| {
                let call = upstream.get("/api/experiences").query("page", page.to_string());
                match city_slug {
                    Some(slug) => call.query("citySlug", slug),
                    None => call,
                }
            })
            .await?;

        Ok(ExperiencePage {
            experiences: list
                .experiences
                .into_iter()
                .map(|record| Experience::from_record(record, &self.media))
                .collect(),
            pagination: list.pagination,
        })
    }

    /// An experience detail page.
    ///
    /// # Errors
    ///
    /// Returns the last downstream error once retries are exhausted.
    pub async fn experience(&self, id: &str) -> Result<Experience> {
        let detail: ExperienceDetail = self
            .fetch(|upstream| upstream.get("/api/experiences").segment(id))
            .await?;
        Ok(Experience::from_record(detail.experience, &self.media))
    }

    /// Fetch and decode `T`, rebuilding the call for each attempt.
    ///
    /// # Errors
    ///
    /// Returns the last downstream error once retries are exhausted.
    pub async fn fetch<T, B>(&self, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn(&UpstreamClient) -> Call<'_>,
    {
        self.policy
            .run(|_| build(&self.upstream).fetch::<T>())
            .await
    }

    /// Like [`SiteClient::fetch`], but abandoned when `registration` is
    /// aborted (the page request went away).
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` when aborted.
    pub async fn fetch_abortable<T, B>(&self, registration: AbortRegistration, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn(&UpstreamClient) -> Call<'_>,
    {
        self.policy
            .run_abortable(registration, |_| build(&self.upstream).fetch::<T>())
            .await
    }
}
