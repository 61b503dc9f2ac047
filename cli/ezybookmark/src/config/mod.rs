use std::collections::{BTreeMap, HashMap};
use std::env;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use log::debug;
use serde::Deserialize;
use url::Url;

/// Name of the directory holding the configuration file
const EZYBOOKMARK_DIR_NAME: &str = "ezybookmark";
const EZYBOOKMARK_CONFIG_DIR_VAR: &str = "EZYBOOKMARK_CONFIG_DIR";
const ENV_PREFIX: &str = "EZYBOOKMARK_";
pub const EZYBOOKMARK_CONFIG_FILE: &str = "ezybookmark.toml";
pub const TOKEN_VAR: &str = "EZYBOOKMARK_TOKEN";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_TOOL_LIMIT: u32 = 100;

#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base URL of the catalog API
    pub api_url: Url,
    /// Session token, the session is signed out without one
    #[serde(default)]
    pub token: Option<String>,
    /// Maximum number of tools loaded per category
    pub tool_limit: NonZeroU32,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Additional headers sent with every request
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    /// Directory the configuration file is read from.
    ///
    /// Set from `$EZYBOOKMARK_CONFIG_DIR` or the user's config directory,
    /// the configuration itself cannot change it.
    pub config_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("tool_limit", &self.tool_limit)
            .field("user_agent", &self.user_agent)
            .field("extra_headers", &self.extra_headers)
            .field("config_dir", &self.config_dir)
            .finish()
    }
}

impl Config {
    /// Read the configuration from defaults, the config file and the
    /// `EZYBOOKMARK_*` environment variables, in increasing precedence.
    pub fn parse() -> Result<Config> {
        let config_dir = match env::var(EZYBOOKMARK_CONFIG_DIR_VAR) {
            Ok(v) => {
                debug!("`${EZYBOOKMARK_CONFIG_DIR_VAR}` set: {v}");
                PathBuf::from(v)
            },
            Err(_) => {
                let config_dir = dirs::config_dir()
                    .context("Could not determine the user config directory")?
                    .join(EZYBOOKMARK_DIR_NAME);
                debug!("`${EZYBOOKMARK_CONFIG_DIR_VAR}` not set, using {config_dir:?}");
                config_dir
            },
        };

        let envs = env::vars()
            .filter_map(|(k, v)| k.strip_prefix(ENV_PREFIX).map(|k| (k.to_owned(), v)))
            .collect();

        Self::from_sources(&config_dir, envs)
    }

    /// Build the configuration from an explicit directory and environment.
    ///
    /// `envs` holds variables with the `EZYBOOKMARK_` prefix already removed.
    fn from_sources(config_dir: &Path, envs: HashMap<String, String>) -> Result<Config> {
        let config_file = config_dir.join(EZYBOOKMARK_CONFIG_FILE);
        debug!("reading config from {config_file:?}");

        let final_config = HierarchicalConfig::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("tool_limit", i64::from(DEFAULT_TOOL_LIMIT))?
            .set_override("config_dir", config_dir.to_string_lossy().into_owned())?
            .add_source(
                config::File::from(config_file)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().source(Some(envs)).try_parsing(true))
            .build()?;

        final_config
            .try_deserialize()
            .context("Could not parse config")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(EZYBOOKMARK_CONFIG_FILE)
    }
}
