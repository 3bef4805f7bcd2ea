//! Layered client settings.
//!
//! Built-in defaults, then an optional settings file, then `DINING__*`
//! environment variables (e.g. `DINING__CONCURRENT=8`).

use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigSource, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::client::{MenuClient, DEFAULT_BASE_URL};
use crate::error::DiningError;

pub const DEFAULT_CONCURRENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub base_url: String,
    /// Simultaneous in-flight requests per fan-out call.
    pub concurrent: usize,
    /// Per-request timeout in milliseconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrent: DEFAULT_CONCURRENT,
            timeout_ms: None,
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given and present.
    pub fn load(path: Option<&Path>) -> Result<Self, DiningError> {
        let mut builder = ConfigSource::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("concurrent", DEFAULT_CONCURRENT as u64)?;

        if let Some(path) = path {
            info!("loading dining settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("DINING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        if settings.concurrent == 0 {
            return Err(DiningError::InvalidConcurrency);
        }
        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn menu_client(&self) -> Result<MenuClient, DiningError> {
        Ok(MenuClient::new(&self.base_url)?.with_timeout(self.timeout()))
    }
}
