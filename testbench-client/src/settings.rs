//! Client settings.
//!
//! Sources are merged in this order, later ones winning:
//! 1. `ApiSettings::default()`
//! 2. a TOML file, when one is given and exists
//! 3. environment variables prefixed with `TESTBENCH_` (e.g. `TESTBENCH_TIMEOUT_MS`)

use crate::error::{Error, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

pub const DEFAULT_FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";
const DEFAULT_BASE_URL: &str = "/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const ENV_PREFIX: &str = "TESTBENCH_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Scheme and authority a relative `base_url` is resolved against.
    pub origin: String,
    /// Either a path such as `/api`, or an absolute URL that ignores `origin`.
    pub base_url: String,
    pub timeout_ms: u64,
    pub fallback_error_message: String,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback_error_message: DEFAULT_FALLBACK_ERROR_MESSAGE.to_string(),
            user_agent: concat!("testbench-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn resolved_base_url(&self) -> Result<Url> {
        if let Ok(url) = Url::parse(&self.base_url) {
            return Ok(url);
        }

        let origin = Url::parse(&self.origin).map_err(|source| Error::InvalidUrl {
            url: self.origin.clone(),
            source,
        })?;

        origin
            .join(&self.base_url)
            .map_err(|source| Error::InvalidUrl {
                url: self.base_url.clone(),
                source,
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::Config(Box::new(figment::Error::from(
                "timeout_ms must be greater than zero".to_string(),
            ))));
        }
        self.resolved_base_url().map(|_| ())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(&self) -> Result<ApiSettings> {
        let mut figment = Figment::new().merge(Serialized::defaults(ApiSettings::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                tracing::debug!("loading settings from {}", config_path.display());
                figment = figment.merge(Toml::file(config_path));
            } else {
                tracing::warn!(
                    "settings file {} not found, using defaults",
                    config_path.display()
                );
            }
        }

        let settings: ApiSettings = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        settings.validate()?;

        Ok(settings)
    }
}
