//! Browser session cookie persistence.
//!
//! The rendering-service adapter restores a previously saved jar before
//! navigating and overwrites it after a fresh login. The jar's lifecycle
//! is independent of any single session. Concurrent fetches race on the
//! file with no locking; last writer wins.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::extractor::error::ExtractorError;

/// One session cookie as reported by the rendering service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
        }
    }
}

pub trait CookieStore: Send + Sync {
    /// Load the persisted jar, `None` if no jar has been saved yet.
    fn load(&self) -> Result<Option<Vec<Cookie>>, ExtractorError>;

    /// Persist `cookies`, replacing any previous jar.
    fn save(&self, cookies: &[Cookie]) -> Result<(), ExtractorError>;
}

/// Cookie jar persisted as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCookieStore {
    path: PathBuf,
}

impl JsonFileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CookieStore for JsonFileCookieStore {
    fn load(&self) -> Result<Option<Vec<Cookie>>, ExtractorError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, cookies: &[Cookie]) -> Result<(), ExtractorError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(cookies)?)?;
        Ok(())
    }
}

/// In-memory jar for tests.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    jar: Mutex<Option<Vec<Cookie>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookies(cookies: Vec<Cookie>) -> Self {
        Self {
            jar: Mutex::new(Some(cookies)),
        }
    }
}

impl CookieStore for MemoryCookieStore {
    fn load(&self) -> Result<Option<Vec<Cookie>>, ExtractorError> {
        Ok(self.jar.lock().expect("cookie jar lock poisoned").clone())
    }

    fn save(&self, cookies: &[Cookie]) -> Result<(), ExtractorError> {
        *self.jar.lock().expect("cookie jar lock poisoned") = Some(cookies.to_vec());
        Ok(())
    }
}
