//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::Res;

/// Default path of the reaction cache file.
fn default_store_file_path() -> String {
    "store.json".to_string()
}

/// Default timeout for requests to the workspace service.
fn default_request_timeout_secs() -> u64 {
    30
}

/// Default delay before re-opening a dropped event stream.
fn default_reconnect_delay_secs() -> u64 {
    5
}

/// Configuration for the reaction-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Base URL of the workspace service (`LIMOO_URL`).
    pub limoo_url: String,
    /// Bot login name (`BOT_USERNAME`).
    pub bot_username: String,
    /// Bot password (`BOT_PASSWORD`).
    pub bot_password: String,
    /// Path of the reaction cache file (`STORE_FILE_PATH`).
    #[serde(default = "default_store_file_path")]
    pub store_file_path: String,
    /// Timeout, in seconds, applied to each request to the workspace service (`REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay, in seconds, before reconnecting a dropped event stream (`RECONNECT_DELAY_SECS`).
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl ConfigInner {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("REACTION_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        let url = reqwest::Url::parse(&self.limoo_url).map_err(|e| anyhow::anyhow!("Invalid workspace service URL `{}`: {}", self.limoo_url, e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!("Workspace service URL must use http or https."));
        }

        if self.request_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Request timeout must be at least 1 second."));
        }

        if self.reconnect_delay_secs < 1 {
            return Err(anyhow::anyhow!("Reconnect delay must be at least 1 second."));
        }

        Ok(())
    }
}

// Tests.
