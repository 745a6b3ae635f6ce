//! Core types for the wayfare gateway.
//!
//! This crate holds the shapes that cross the gateway in both directions:
//!
//! - **Envelope**: the outbound `{ success, data | message | error }` body
//!   every route answers with, plus the envelope some downstream endpoints
//!   already reply with
//! - **Models**: the declared downstream schema per endpoint and the explicit
//!   mapping into the outbound representation
//! - **Media**: resolution of stored asset paths against the image service
//!
//! # Example
//!
//! ```
//! use wayfare_core::models::{City, CityList};
//! use wayfare_core::{Envelope, MediaBase};
//!
//! let downstream: CityList =
//!     serde_json::from_str(r#"{"cities":[{"id":1,"name":"Bali"}]}"#).unwrap();
//! let media = MediaBase::new("http://images.local");
//!
//! let cities: Vec<City> = downstream
//!     .cities
//!     .into_iter()
//!     .map(|record| City::from_record(record, &media))
//!     .collect();
//!
//! let body = serde_json::to_value(Envelope::data(cities)).unwrap();
//! assert_eq!(body["data"][0]["slug"], "bali");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod envelope;
pub mod media;
pub mod models;
pub mod slug;

pub use envelope::{DownstreamEnvelope, Envelope, Pagination};
pub use media::MediaBase;
pub use models::Id;
pub use slug::slugify;
