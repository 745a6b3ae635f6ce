//! Response envelopes.
//!
//! Every gateway route answers with an [`Envelope`]. A subset of downstream
//! endpoints already wrap their payload the same way; those are decoded
//! through [`DownstreamEnvelope`].

use serde::{Deserialize, Serialize};

/// Outbound JSON body: `{ success, data?, message?, error?, pagination? }`.
///
/// Absent fields are omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine-readable error code on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Paging information for list payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    #[must_use]
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: None,
        }
    }

    /// Attach a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach paging information, if any.
    #[must_use]
    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }
}

impl Envelope<()> {
    /// A successful envelope carrying only a message.
    #[must_use]
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            pagination: None,
        }
    }

    /// A failed envelope with an error code and a message.
    #[must_use]
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(code.into()),
            pagination: None,
        }
    }
}

/// Paging information, shared by downstream list replies and outbound lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total number of records.
    pub total: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

/// Envelope used by downstream endpoints that reply `{ success, data, ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownstreamEnvelope<T> {
    /// Downstream success flag. Missing is read as `true`.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Downstream payload.
    pub data: Option<T>,
    /// Downstream message.
    #[serde(default)]
    pub message: Option<String>,
    /// Downstream error text.
    #[serde(default)]
    pub error: Option<String>,
}

const fn default_success() -> bool {
    true
}

impl<T> DownstreamEnvelope<T> {
    /// The most descriptive text the downstream gave, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
