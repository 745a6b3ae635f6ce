//! Gateway application state.
//!
//! The only thing shared between requests: immutable configuration and the
//! pooled downstream client.

use wayfare_auth::SessionCookie;
use wayfare_core::MediaBase;
use wayfare_upstream::{Result, UpstreamClient};

use crate::config::GatewayConfig;
use crate::guard::AccessGuard;

/// Shared application state for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Gateway configuration.
    pub config: GatewayConfig,
    /// Client for the downstream API.
    pub upstream: UpstreamClient,
    /// Image service base, for asset URLs in replies.
    pub media: MediaBase,
    /// Session cookie policy.
    pub session_cookie: SessionCookie,
    /// Edge check for protected pages.
    pub guard: AccessGuard,
}

impl GatewayState {
    /// Create the gateway state from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.addresses.api, config.upstream_timeout())?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create the gateway state around an existing downstream client.
    #[must_use]
    pub fn with_upstream(config: GatewayConfig, upstream: UpstreamClient) -> Self {
        let media = MediaBase::new(&config.addresses.images);
        let session_cookie = config.session_cookie();
        let guard = AccessGuard::new(&config.guard, session_cookie.name());
        Self {
            config,
            upstream,
            media,
            session_cookie,
            guard,
        }
    }

    /// Name of the session cookie.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        self.session_cookie.name()
    }
}
