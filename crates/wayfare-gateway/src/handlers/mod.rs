//! HTTP request handlers.
//!
//! One handler per resource and action. Each reduces to a [`Route`]
//! description plus the mapping of its downstream schema.
//!
//! [`Route`]: crate::dispatch::Route

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cities;
pub mod experiences;
pub mod health;
pub mod uploads;
