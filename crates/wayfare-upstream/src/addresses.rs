//! Backend address resolution.
//!
//! The same gateway binary runs next to the API inside a private network and
//! on hosts that only see its public address. Each base URL is chosen by
//! precedence: internal address, then public address, then a local
//! development default.

use serde::Deserialize;

/// Preferred downstream API address (private network).
pub const INTERNAL_API_URL: &str = "INTERNAL_API_URL";
/// Fallback downstream API address (public).
pub const PUBLIC_API_URL: &str = "NEXT_PUBLIC_API_URL";
/// Preferred image service address (private network).
pub const INTERNAL_IMAGES_URL: &str = "INTERNAL_IMAGES_URL";
/// Fallback image service address (public).
pub const PUBLIC_IMAGES_URL: &str = "NEXT_PUBLIC_IMAGES";

/// API base used when neither variable is set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Image base used when neither variable is set.
pub const DEFAULT_IMAGES_URL: &str = "http://localhost:5000/uploads";

/// Resolved downstream base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendAddresses {
    /// Downstream API base URL.
    pub api: String,
    /// Image service base URL.
    pub images: String,
}

impl BackendAddresses {
    /// Resolve both addresses from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve both addresses from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api: resolve_address(
                [lookup(INTERNAL_API_URL), lookup(PUBLIC_API_URL)],
                DEFAULT_API_URL,
            ),
            images: resolve_address(
                [lookup(INTERNAL_IMAGES_URL), lookup(PUBLIC_IMAGES_URL)],
                DEFAULT_IMAGES_URL,
            ),
        }
    }
}

impl Default for BackendAddresses {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_string(),
            images: DEFAULT_IMAGES_URL.to_string(),
        }
    }
}

/// Pick the first non-blank candidate, or `default`.
///
/// The result never ends with `/`.
#[must_use]
pub fn resolve_address(
    candidates: impl IntoIterator<Item = Option<String>>,
    default: &str,
) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(|candidate| candidate.trim().trim_end_matches('/').to_string())
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| default.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wayfare_core::MediaBase;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_image_base_resolves_stored_paths_once() {
        let media = MediaBase::new(BackendAddresses::default().images);
        assert_eq!(
            media.resolve("/uploads/abc.jpg"),
            "http://localhost:5000/uploads/abc.jpg"
        );
    }

    #[test]
    fn internal_wins() {
        let addresses = BackendAddresses::from_lookup(lookup(&[
            (INTERNAL_API_URL, "http://api:5000"),
            (PUBLIC_API_URL, "https://api.wayfare.io"),
        ]));
        assert_eq!(addresses.api, "http://api:5000");
    }

    #[test]
    fn public_is_fallback() {
        let addresses = BackendAddresses::from_lookup(lookup(&[
            (PUBLIC_API_URL, "https://api.wayfare.io/"),
            (PUBLIC_IMAGES_URL, "https://img.wayfare.io"),
        ]));
        assert_eq!(addresses.api, "https://api.wayfare.io");
        assert_eq!(addresses.images, "https://img.wayfare.io");
    }

    #[test]
    fn blank_values_are_skipped() {
        let addresses = BackendAddresses::from_lookup(lookup(&[
            (INTERNAL_API_URL, "  "),
            (PUBLIC_API_URL, "https://api.wayfare.io"),
        ]));
        assert_eq!(addresses.api, "https://api.wayfare.io");
    }

    #[test]
    fn defaults_for_local_development() {
        let addresses = BackendAddresses::from_lookup(lookup(&[]));
        assert_eq!(addresses, BackendAddresses::default());
        assert_eq!(addresses.api, DEFAULT_API_URL);
        assert_eq!(addresses.images, DEFAULT_IMAGES_URL);
    }
}
