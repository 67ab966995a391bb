//! Per-platform API key storage.
//!
//! Adapters only ever read; the file is written by whatever front end
//! manages configuration. Keys are stored under the platform's string
//! name (`youtube`, `twitter`, ...) in a flat JSON object, and an empty
//! string counts as unset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::extractor::dispatcher::Platform;
use crate::extractor::error::ExtractorError;

pub trait CredentialStore: Send + Sync {
    /// Look up the API key configured for `platform`, if any.
    fn api_key(&self, platform: Platform) -> Result<Option<String>, ExtractorError>;
}

/// Credential store backed by a flat JSON file (`{"youtube": "...", ...}`).
///
/// The file is re-read on every lookup; adapters never cache a key across
/// calls, so edits take effect immediately.
#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<BTreeMap<String, String>, ExtractorError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, keys: &BTreeMap<String, String>) -> Result<(), ExtractorError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(keys)?)?;
        Ok(())
    }

    pub fn set_key(&self, platform: Platform, key: &str) -> Result<(), ExtractorError> {
        let mut keys = self.load()?;
        keys.insert(platform.to_string(), key.to_string());
        self.save(&keys)
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn api_key(&self, platform: Platform) -> Result<Option<String>, ExtractorError> {
        let keys = self.load()?;
        let key = keys
            .get(&platform.to_string())
            .filter(|k| !k.trim().is_empty())
            .cloned();
        debug!(platform = %platform, configured = key.is_some(), "credential lookup");
        Ok(key)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    keys: BTreeMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, platform: Platform, key: impl Into<String>) -> Self {
        self.keys.insert(platform.to_string(), key.into());
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn api_key(&self, platform: Platform) -> Result<Option<String>, ExtractorError> {
        Ok(self
            .keys
            .get(&platform.to_string())
            .filter(|k| !k.trim().is_empty())
            .cloned())
    }
}
