//! Catalog interaction types.
//!
//! These are the JSON shapes exchanged with the catalog API.
//! Field names are camelCase on the wire.

use std::fmt::Debug;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display, From};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use url::Url;

use crate::error::CatalogClientError;

/// Opaque, server assigned tool identifier
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Deref,
)]
#[serde(transparent)]
pub struct ToolId(String);

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        ToolId(id.to_string())
    }
}

impl AsRef<str> for ToolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A catalogued resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    pub description: String,
    pub url: Url,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Overrides the icon derived from `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default)]
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tools grouped by category label, in the order the server listed them.
pub type CategorizedTools = IndexMap<String, Vec<Tool>>;

/// A per-user relation to a [Tool] carrying pin state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub tool_id: ToolId,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the bookmarked tool, if the endpoint embeds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatus {
    pub is_bookmarked: bool,
    pub is_pinned: bool,
}

/// Body of `POST /tools`
///
/// Only `url` is required, the server derives everything else from the
/// site itself.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    pub url: String,
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favicon: Option<String>,
}

impl CreateToolRequest {
    /// Request for `url` with an optional category.
    ///
    /// The URL is trimmed and an empty category means "auto-detect".
    pub fn new(url: impl AsRef<str>, category: Option<String>) -> Self {
        Self {
            url: url.as_ref().trim().to_string(),
            category: category.filter(|category| !category.trim().is_empty()),
            ..Default::default()
        }
    }

    /// Check the URL before sending it to the server.
    pub fn validate(&self) -> Result<Url, CatalogClientError> {
        validate_tool_url(&self.url)
    }
}

const URL_REQUIRED: &str = "URL is required";
const URL_MALFORMED: &str = "Please enter a valid URL (e.g., https://example.com)";
const URL_NOT_HTTP: &str = "URL must use HTTP or HTTPS protocol";
const URL_NO_HOST: &str = "URL must have a valid domain name";

/// Messages of URLs rejected by [validate_tool_url]
pub(crate) const LOCAL_URL_ERRORS: [&str; 4] =
    [URL_REQUIRED, URL_MALFORMED, URL_NOT_HTTP, URL_NO_HOST];

/// Validate a user supplied tool URL.
pub fn validate_tool_url(input: &str) -> Result<Url, CatalogClientError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CatalogClientError::InvalidUrl(URL_REQUIRED.to_string()));
    }

    let url = Url::parse(input).map_err(|_| {
        CatalogClientError::InvalidUrl(URL_MALFORMED.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CatalogClientError::InvalidUrl(URL_NOT_HTTP.to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CatalogClientError::InvalidUrl(URL_NO_HOST.to_string()));
    }

    Ok(url)
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PinRequest {
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateBookmarkRequest<'a> {
    pub tool_id: &'a ToolId,
    pub is_pinned: bool,
}

/// Query parameters of `GET /tools`, absent values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<NonZeroU32>,
    pub limit: Option<NonZeroU32>,
}

impl ToolQuery {
    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// One page of `GET /tools`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsPage {
    pub data: Vec<Tool>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Per-tool results of a bulk pin state change, in request order.
///
/// Bulk changes are a fan-out of independent requests,
/// so any subset of them may fail.
#[derive(Debug, Default)]
pub struct BulkPinOutcome {
    pub outcomes: Vec<(ToolId, Result<Bookmark, CatalogClientError>)>,
}

impl BulkPinOutcome {
    pub fn succeeded(&self) -> impl Iterator<Item = &ToolId> {
        self.outcomes
            .iter()
            .filter(|(_, result)| result.is_ok())
            .map(|(id, _)| id)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&ToolId, &CatalogClientError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|err| (id, err)))
    }

    pub fn n_succeeded(&self) -> usize {
        self.succeeded().count()
    }

    pub fn n_failed(&self) -> usize {
        self.failed().count()
    }
}
