//! Downstream API access for the wayfare gateway.
//!
//! - [`BackendAddresses`]: picks the API and image base URLs from the
//!   environment (internal, then public, then a local default)
//! - [`UpstreamClient`] and [`Call`]: one downstream request per inbound
//!   request, with the caller's credential attached
//! - [`RetryPolicy`] and [`SiteClient`]: retried, cancellable fetches for
//!   server-rendered page data
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use wayfare_core::MediaBase;
//! use wayfare_upstream::{BackendAddresses, SiteClient, UpstreamClient};
//!
//! # async fn example() -> wayfare_upstream::Result<()> {
//! let addresses = BackendAddresses::from_env();
//! let upstream = UpstreamClient::new(&addresses.api, Duration::from_secs(30))?;
//! let site = SiteClient::new(upstream, MediaBase::new(&addresses.images));
//!
//! for city in site.popular_cities(6).await? {
//!     println!("{} {}", city.emoji, city.name);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod addresses;
pub mod client;
pub mod error;
pub mod retry;
pub mod site;

pub use addresses::{resolve_address, BackendAddresses};
pub use client::{Call, Payload, Reply, UpstreamClient, DEFAULT_TIMEOUT};
pub use error::{Result, UpstreamError};
pub use retry::RetryPolicy;
pub use site::{ExperiencePage, SiteClient};
