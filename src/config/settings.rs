use std::net::SocketAddr;

use tracing::debug;

use crate::models::errors::ConfigError;
use crate::utils::utils::{is_valid_http_url, parse_bool};

pub const DEFAULT_BASE_ENDPOINT: &str = "https://riipen.mediacore.tv";
pub const DEFAULT_CREDENTIAL: &str = "riipenchallenge@mediacore.com:riipenchallenge";
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:3000";

const ENV_BASE_ENDPOINT: &str = "WIDGET_BASE_ENDPOINT";
const ENV_CREDENTIAL: &str = "WIDGET_CREDENTIAL";
const ENV_AUTOPLAY: &str = "WIDGET_AUTOPLAY";
const ENV_DISCARD_STALE_LOADS: &str = "WIDGET_DISCARD_STALE_LOADS";
const ENV_LISTEN_ADDRESS: &str = "WIDGET_LISTEN_ADDRESS";

/// Everything the fetcher and the widget need to know about their
/// surroundings. Passed in at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// API host every fetch path is appended to, without a trailing slash.
    pub base_endpoint: String,
    /// Basic-Authentication credential in `user:password` form.
    pub credential: String,
    /// Start playback on `ready` and advance on `ended`.
    pub autoplay: bool,
    /// Drop detail responses that belong to a superseded load.
    pub discard_stale_loads: bool,
    pub listen_address: SocketAddr,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_endpoint: DEFAULT_BASE_ENDPOINT.to_string(),
            credential: DEFAULT_CREDENTIAL.to_string(),
            autoplay: true,
            discard_stale_loads: true,
            listen_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl WidgetConfig {
    /// Defaults overridden by the process environment (and a `.env` file,
    /// when one exists).
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let lookup = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        if let Some(endpoint) = lookup(ENV_BASE_ENDPOINT) {
            config.base_endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(credential) = lookup(ENV_CREDENTIAL) {
            config.credential = credential;
        }
        if let Some(raw) = lookup(ENV_AUTOPLAY) {
            config.autoplay = parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                name: ENV_AUTOPLAY,
                value: raw,
            })?;
        }
        if let Some(raw) = lookup(ENV_DISCARD_STALE_LOADS) {
            config.discard_stale_loads = parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                name: ENV_DISCARD_STALE_LOADS,
                value: raw,
            })?;
        }
        if let Some(raw) = lookup(ENV_LISTEN_ADDRESS) {
            config.listen_address = raw.parse().map_err(|_| ConfigError::InvalidAddress {
                name: ENV_LISTEN_ADDRESS,
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_http_url(&self.base_endpoint) {
            return Err(ConfigError::InvalidEndpoint {
                name: ENV_BASE_ENDPOINT,
                value: self.base_endpoint.clone(),
            });
        }
        if self.credential.is_empty() {
            return Err(ConfigError::EmptyCredential {
                name: ENV_CREDENTIAL,
            });
        }
        Ok(())
    }

    /// Splits the credential into the user and optional password halves
    /// expected by a Basic-Authentication header.
    pub fn basic_auth(&self) -> (&str, Option<&str>) {
        match self.credential.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (self.credential.as_str(), None),
        }
    }
}
