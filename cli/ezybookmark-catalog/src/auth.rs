//! Session token providers for catalog requests
//!
//! The client asks its [TokenProvider] for a token before every request.
//! Signing in and out is the business of whoever implements the provider;
//! the client only consumes the capability.

use std::fmt::{self, Debug};

use futures::future::{self, BoxFuture};
use reqwest::header::{self, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::{debug, warn};

/// Future returned by [TokenProvider::token]
pub type TokenFuture<'a> = BoxFuture<'a, Result<Option<String>, TokenError>>;

#[derive(Debug, Error)]
#[error("failed to get session token: {0}")]
pub struct TokenError(pub String);

/// Supplies a bearer token for each catalog request.
pub trait TokenProvider: Debug + Send + Sync {
    /// Fetch a fresh token, or `None` if the session is signed out.
    fn token(&self) -> TokenFuture<'_>;

    /// Called once for every request the server rejected with
    /// `401 Unauthorized`.
    ///
    /// Interactive front ends send the user to their sign-in view here.
    fn sign_in_required(&self) {
        warn!("authentication required, please sign in again");
    }
}

/// A provider for signed-out sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenProvider for Anonymous {
    fn token(&self) -> TokenFuture<'_> {
        Box::pin(future::ready(Ok(None)))
    }
}

/// A provider that always hands out the same token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> TokenFuture<'_> {
        Box::pin(future::ready(Ok(Some(self.0.clone()))))
    }
}

/// Build the authorization header for a single request.
///
/// A missing token is not an error, the request is sent unauthenticated
/// and the server decides whether that is acceptable.
pub(crate) fn auth_headers(token: Option<&str>) -> HeaderMap {
    let mut header_map = HeaderMap::new();
    let Some(token) = token else {
        return header_map;
    };

    let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {token}")) else {
        warn!("failed to create header value from bearer token");
        return header_map;
    };
    value.set_sensitive(true);
    header_map.insert(header::AUTHORIZATION, value);
    debug!("added bearer token authorization header");
    header_map
}
