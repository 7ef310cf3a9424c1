use crate::error::{BetfairError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub const LOGIN_URL: &str = "https://identitysso.betfair.com/api/login";
pub const BETTING_URL: &str = "https://api.betfair.com/exchange/betting/json-rpc/v1";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Clone, Deserialize)]
pub struct BetfairConfig {
    pub username: String,
    pub password: String,
    pub api_key: String,
    #[serde(default)]
    pub locale: Option<String>,
}

impl fmt::Debug for BetfairConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BetfairConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &self.api_key)
            .field("locale", &self.locale)
            .finish()
    }
}

/// Login and betting endpoint URLs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_betting_url")]
    pub betting_url: String,
}

fn default_login_url() -> String {
    LOGIN_URL.to_string()
}

fn default_betting_url() -> String {
    BETTING_URL.to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            betting_url: default_betting_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub betfair: BetfairConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Loads `config.toml` from the working directory.
    pub fn new() -> Result<Self> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|source| BetfairError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = config_str.parse()?;
        info!(
            "Loaded config from {} for user {}",
            path.display(),
            config.betfair.username
        );
        Ok(config)
    }
}

impl FromStr for Config {
    type Err = BetfairError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
