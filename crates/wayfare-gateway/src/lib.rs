//! HTTP gateway for the wayfare travel marketplace.
//!
//! Browser clients (the public site and the admin console) never talk to the
//! downstream API directly. This crate sits in between and handles:
//!
//! - Credential forwarding (bearer header or session cookie)
//! - Request reshaping: path segments, query renames, required body fields
//! - Translation of every failure into a JSON envelope
//! - The Access Guard for protected page navigation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Browser clients                          │
//! │              (public site / admin console)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     wayfare-gateway                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   Access    │ │   Router    │ │   Route dispatch    │    │
//! │  │   Guard     │ │ + Handlers  │ │  (auth → validate)  │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                      ┌──────────────┐
//!                      │ Downstream   │
//!                      │ API          │
//!                      └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use wayfare_gateway::{create_router, GatewayConfig, GatewayState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env();
//! let listen_addr = config.listen_addr.clone();
//! let state = GatewayState::new(config)?;
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{Environment, GatewayConfig, GuardConfig};
pub use dispatch::{Access, Route};
pub use error::ApiError;
pub use guard::{AccessGuard, Decision};
pub use routes::create_router;
pub use state::GatewayState;
