//! Configuration types for catalog client construction.

use std::collections::BTreeMap;

use url::Url;

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the API, e.g. `http://localhost:3001/api`.
    pub api_url: Url,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Overrides the default `ezybookmark/<version>` user agent.
    pub user_agent: Option<String>,
}

impl CatalogClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            extra_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}
