//! Project Lens configuration.
//!
//! Sources, lowest to highest priority:
//! built-in defaults, `~/.config/project-lens/config.toml` (or the file named
//! by `LENS_CONFIG`), `LENS__SECTION__KEY` environment variables, and the
//! hosting variables `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `APP_BASE_URL`.
//!
//! The web app's `NEXT_PUBLIC_SUPABASE_URL` and `NEXT_PUBLIC_SUPABASE_ANON_KEY`
//! are read when the unprefixed names are unset or blank.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

use crate::constants::{DEFAULT_CALENDAR_NAME, MAX_FEED_EVENTS};
use crate::error::{LensError, LensResult};

const ENV_PREFIX: &str = "LENS";
const CONFIG_PATH_VAR: &str = "LENS_CONFIG";
const STORE_URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const STORE_KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LensConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connection to the REST gateway in front of the project database.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    /// Public URL of the web app, used for links back to projects
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_max_events() -> usize {
    MAX_FEED_EVENTS
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            calendar_name: default_calendar_name(),
            base_url: None,
            max_events: default_max_events(),
        }
    }
}

impl LensConfig {
    /// Default location of the config file.
    pub fn config_path() -> LensResult<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_VAR) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| LensError::Config("Could not determine config directory".into()))?
            .join("project-lens");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from all sources.
    pub fn load() -> LensResult<Self> {
        let path = Self::config_path()?;
        Self::load_from(path)
    }

    /// Load config using `path` as the (optional) config file.
    pub fn load_from(path: PathBuf) -> LensResult<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("store.url", first_non_empty_var(STORE_URL_VARS))
            .and_then(|b| b.set_override_option("store.api_key", first_non_empty_var(STORE_KEY_VARS)))
            .and_then(|b| b.set_override_option("feed.base_url", first_non_empty_var(&["APP_BASE_URL"])))
            .map_err(|e| LensError::Config(e.to_string()))?
            .build()
            .map_err(|e| LensError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| LensError::Config(e.to_string()))
    }
}

fn first_non_empty_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}
