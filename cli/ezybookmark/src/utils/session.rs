use std::fmt::{self, Debug};
use std::path::PathBuf;

use ezybookmark_catalog::{TokenFuture, TokenProvider};
use futures::future;

use crate::config::TOKEN_VAR;
use crate::utils::message;

/// A session backed by the token from the configuration.
///
/// There is no interactive sign in, when the server rejects the token
/// the user is told where to put a new one.
pub struct ConfiguredSession {
    token: Option<String>,
    config_file: PathBuf,
}

impl ConfiguredSession {
    pub fn new(token: Option<String>, config_file: PathBuf) -> Self {
        Self { token, config_file }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

impl Debug for ConfiguredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredSession")
            .field("signed_in", &self.is_signed_in())
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl TokenProvider for ConfiguredSession {
    fn token(&self) -> TokenFuture<'_> {
        Box::pin(future::ready(Ok(self.token.clone())))
    }

    /// The only sign-in message of a failed command, `main` prints just the error.
    fn sign_in_required(&self) {
        message::warning(self.sign_in_hint());
    }
}

impl ConfiguredSession {
    fn sign_in_hint(&self) -> String {
        format!(
            "Authentication required. Sign in again and set the new token with '{TOKEN_VAR}' or 'token' in '{}'.",
            self.config_file.display()
        )
    }
}
