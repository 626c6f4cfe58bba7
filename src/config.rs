use serde::Deserialize;
use std::{io::ErrorKind, path::Path, time::Duration};

use crate::constants::{
    ACCOUNT_DELAY, BASE_URL, CONFIG_FILE_PATH, CYCLE_DELAY, PROXIES_FILE_PATH, REQUEST_TIMEOUT,
    TOKENS_FILE_PATH,
};

/// Delays and timeouts are in milliseconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct Config {
    pub tokens_file_path: String,
    pub proxies_file_path: String,
    pub base_url: String,
    pub account_delay: u64,
    pub cycle_delay: u64,
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokens_file_path: TOKENS_FILE_PATH.to_string(),
            proxies_file_path: PROXIES_FILE_PATH.to_string(),
            base_url: BASE_URL.to_string(),
            account_delay: ACCOUNT_DELAY,
            cycle_delay: CYCLE_DELAY,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Falls back to defaults when the file does not exist; a malformed file is an error.
    pub async fn read_default() -> eyre::Result<Self> {
        match Self::read_from_file(CONFIG_FILE_PATH).await {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == ErrorKind::NotFound) =>
            {
                tracing::info!("{CONFIG_FILE_PATH} not found, using default config");
                Ok(Self::default())
            }
            Err(e) => Err(e.wrap_err(format!("Invalid config at {CONFIG_FILE_PATH}"))),
        }
    }

    pub fn account_delay(&self) -> Duration {
        Duration::from_millis(self.account_delay)
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}
