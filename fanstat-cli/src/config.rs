use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// CLI configuration, stored as TOML in the platform config directory.
///
/// Everything has a sensible default so the tool works without a config
/// file; the file only exists to relocate the stores or point at a
/// non-local rendering service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding per-platform API keys.
    pub credentials_path: PathBuf,
    /// JSON file holding the douyin session cookie jar.
    pub cookie_jar_path: PathBuf,
    /// Base URL of the headless-browser rendering service.
    pub renderer_url: String,
    /// Optional access token for the rendering service.
    pub renderer_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fanstat");

        Self {
            credentials_path: base.join("api_config.json"),
            cookie_jar_path: base.join("douyin_cookies.json"),
            renderer_url: "http://127.0.0.1:3000".to_string(),
            renderer_token: None,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fanstat")
            .join("config.toml")
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
