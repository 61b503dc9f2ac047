//! HTTP client for the EzyBookmark catalog API.
//!
//! This crate provides:
//! - an HTTP client that attaches a bearer token obtained per request
//!   from an injected [`TokenProvider`]
//! - the error taxonomy shared by all catalog operations
//! - the wire types exchanged with the server
//! - a [`MockClient`] that replays canned responses for tests
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use ezybookmark_catalog::{CatalogClient, CatalogClientConfig, ClientTrait, StaticToken};
//!
//! let config = CatalogClientConfig::new("http://localhost:3001/api".parse()?);
//! let client = CatalogClient::new(config, Arc::new(StaticToken::new(token)))?;
//! let tools = client.tools_by_category(limit).await?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod mock;
pub mod types;

pub use auth::{Anonymous, StaticToken, TokenError, TokenFuture, TokenProvider};
pub use client::{CatalogClient, Client, ClientTrait};
pub use config::CatalogClientConfig;
pub use error::{CatalogClientError, ErrorBody, Operation};
pub use mock::{MockClient, MockDataError, MockError, Response, CATALOG_MOCK_VAR};
