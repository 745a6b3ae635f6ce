//! Image asset resolution.
//!
//! The downstream stores relative asset paths (`/uploads/abc.jpg`); clients
//! need absolute URLs on the image service.

use serde::{Deserialize, Serialize};

/// Base URL of the image service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBase(String);

impl MediaBase {
    /// Create a media base. A trailing `/` is dropped.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    /// The base URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve a stored asset path to an absolute URL.
    ///
    /// Absolute (`http`, `https`) and inline (`data:`) URLs pass through.
    /// A base that already ends in the path's first segment does not repeat
    /// it: `http://host/uploads` with `/uploads/a.jpg` gives
    /// `http://host/uploads/a.jpg`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        let path = match (self.last_segment(), path.split_once('/')) {
            (Some(last), Some((first, rest))) if last == first => rest,
            _ => path,
        };
        format!("{}/{path}", self.0)
    }

    fn last_segment(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("://")?;
        let (_, base_path) = rest.split_once('/')?;
        base_path.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Resolve an optional path, dropping blanks.
    #[must_use]
    pub fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| self.resolve(p))
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
}

/// Downstream reply for a stored upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// Stored path or URL.
    pub url: String,
    /// Original file name.
    #[serde(default)]
    pub filename: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// MIME type reported by the downstream.
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Outbound upload descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    /// Absolute URL on the image service.
    pub url: String,
    /// Original file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Upload {
    /// Map a downstream upload record.
    #[must_use]
    pub fn from_record(record: UploadRecord, media: &MediaBase) -> Self {
        Self {
            url: media.resolve(&record.url),
            filename: record.filename,
            size: record.size,
            mime_type: record.mime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_paths() {
        let media = MediaBase::new("http://images:4000/");
        assert_eq!(
            media.resolve("/uploads/a.jpg"),
            "http://images:4000/uploads/a.jpg"
        );
        assert_eq!(media.resolve("b.png"), "http://images:4000/b.png");
    }

    #[test]
    fn base_ending_in_uploads_is_not_repeated() {
        let media = MediaBase::new("http://localhost:5000/uploads");
        assert_eq!(
            media.resolve("/uploads/abc.jpg"),
            "http://localhost:5000/uploads/abc.jpg"
        );
        assert_eq!(
            media.resolve("avatars/me.png"),
            "http://localhost:5000/uploads/avatars/me.png"
        );
    }

    #[test]
    fn host_named_like_a_segment_is_not_a_path() {
        let media = MediaBase::new("http://uploads");
        assert_eq!(media.resolve("/uploads/a.jpg"), "http://uploads/uploads/a.jpg");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let media = MediaBase::new("http://images:4000");
        assert_eq!(
            media.resolve("https://cdn.example.com/x.jpg"),
            "https://cdn.example.com/x.jpg"
        );
    }

    #[test]
    fn blank_optional_is_none() {
        let media = MediaBase::new("http://images:4000");
        assert_eq!(media.resolve_opt(Some("  ")), None);
        assert_eq!(media.resolve_opt(None), None);
    }
}
