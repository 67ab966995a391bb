use crate::extractor::default::DEFAULT_UA;
use crate::profile::ProfileInfo;

use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::debug;

/// Base extractor shared by all platform adapters.
///
/// Owns the platform's fixed request surface: browser-like default
/// headers, platform-specific headers and query parameters, and a
/// per-adapter cookie store assembled into a `Cookie` header on every
/// request. Each adapter instance is isolated; nothing here is shared
/// across platforms.
#[derive(Debug, Clone)]
pub struct Extractor {
    // name of the platform, e.g., "Bilibili", "Telegram"...
    pub platform_name: String,
    // The reqwest client
    pub client: Client,
    // platform-specific headers and parameters
    platform_headers: HeaderMap,
    pub platform_params: FxHashMap<String, String>,
    pub cookies: FxHashMap<String, String>,
}

impl Extractor {
    pub fn new<S: Into<String>>(platform_name: S, client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3"),
        );
        // Do not set `Accept-Encoding` here.
        // Reqwest auto-adds it (and auto-decompresses) when the corresponding
        // crate features are enabled, as long as we don't override the header.

        Self {
            platform_name: platform_name.into(),
            client,
            platform_headers: default_headers,
            platform_params: FxHashMap::default(),
            cookies: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn set_referer_static(&mut self, referer: &'static str) {
        self.platform_headers
            .insert(reqwest::header::REFERER, HeaderValue::from_static(referer));
    }

    pub fn add_header_str<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn add_param<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.platform_params.insert(key.into(), value.into());
    }

    /// Set cookies from a cookie string (format: "name1=value1; name2=value2").
    pub fn set_cookies_from_string(&mut self, cookie_string: &str) {
        // Accept common separators: ';' from Cookie headers and '\n' from copy/paste.
        for part in cookie_string.split(&[';', '\n'][..]).map(str::trim) {
            if part.is_empty() {
                continue;
            }

            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }

            self.cookies.insert(name.to_owned(), value.to_owned());
        }
    }

    fn build_cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut cookie_string = String::with_capacity(
            self.cookies
                .iter()
                .map(|(k, v)| k.len() + 1 + v.len() + 2)
                .sum(),
        );

        for (name, value) in &self.cookies {
            if !cookie_string.is_empty() {
                cookie_string.push_str("; ");
            }
            cookie_string.push_str(name);
            cookie_string.push('=');
            cookie_string.push_str(value);
        }

        Some(cookie_string)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request with platform headers, query parameters and
    /// stored cookies pre-applied.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut headers = self.platform_headers.clone();

        if let Some(cookie_header) = self.build_cookie_header() {
            match HeaderValue::from_str(&cookie_header) {
                Ok(value) => {
                    headers.insert(reqwest::header::COOKIE, value);
                }
                Err(e) => {
                    // If cookies are malformed, skip the Cookie header instead of
                    // sending an empty/invalid value.
                    debug!(error = %e, "Failed to build Cookie header");
                }
            }
        }

        self.client
            .request(method, url)
            .headers(headers)
            .query(&self.platform_params)
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

/// The fetch-and-normalize contract every platform adapter implements.
///
/// `fetch` must never panic across this boundary; transport faults,
/// upstream error payloads and unexpected page structures all come back
/// as an `ExtractorError` for the dispatcher to flatten into a result.
#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookies_from_string() {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut extractor = Extractor::new("Test", Client::new());
        extractor.set_cookies_from_string("sessionid=abc123; ttwid=def456; =bad; noval=");

        assert_eq!(extractor.cookies.get("sessionid").unwrap(), "abc123");
        assert_eq!(extractor.cookies.get("ttwid").unwrap(), "def456");
        assert_eq!(extractor.cookies.len(), 2);
    }

    #[test]
    fn test_cookie_header_contains_all_pairs() {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut extractor = Extractor::new("Test", Client::new());
        extractor.set_cookies_from_string("a=1; b=2");

        let header = extractor.build_cookie_header().unwrap();
        assert!(header.contains("a=1"));
        assert!(header.contains("b=2"));
    }
}
