use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MarqueeError, Result};
use crate::http::UploadTarget;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: u32,
    pub debounce_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UploadConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("marquee").join("config.toml"))
}

impl Config {
    /// Load the config file at `path`, or the default location. A missing file
    /// yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse(&content)
            .map_err(|e| MarqueeError::Config(format!("{}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.list.page_size = config.list.page_size.max(1);
        Ok(config)
    }

    /// Apply `MARQUEE_API_URL` on top of the file values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MARQUEE_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.list.debounce_ms)
    }

    /// Upload endpoint, if both a URL and a key are available.
    pub fn upload_target(&self) -> Option<UploadTarget> {
        let url = self.upload.url.clone().filter(|u| !u.is_empty())?;
        let api_key = self
            .upload
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .or_else(|| self.upload.api_key.clone())
            .filter(|k| !k.is_empty())?;
        Some(UploadTarget { url, api_key })
    }
}
