//! HTTP client for a headless-browser rendering service.
//!
//! The service (a Browserless-style deployment) owns the actual browser
//! processes. One remote session maps to one isolated browser context:
//! `POST /sessions` starts it, `POST /sessions/{id}/goto` navigates and
//! returns the rendered DOM plus the context's current cookie set, and
//! `DELETE /sessions/{id}` tears the context down. The service reaps
//! sessions whose owner disappears, so a missed DELETE cannot leak a
//! browser process forever, but callers are still expected to close
//! every session they open.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractor::error::ExtractorError;
use crate::store::Cookie;

#[derive(Debug, Clone)]
pub struct RenderClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Browser context options, fixed for the lifetime of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    pub width: u32,
    pub height: u32,
    pub locale: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            locale: "zh-CN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GotoRequest {
    pub url: String,
    /// CSS selector the service waits for before returning, bounded by
    /// `wait_timeout_ms`. Absent selector means "document loaded".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub html: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
}

impl RenderClient {
    pub fn new(client: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        match &self.token {
            Some(token) => format!("{}{}?token={}", self.base_url, path, token),
            None => format!("{}{}", self.base_url, path),
        }
    }

    pub async fn create_session(
        &self,
        options: &SessionOptions,
    ) -> Result<String, ExtractorError> {
        let resp = self
            .client
            .post(self.endpoint("/sessions"))
            .json(options)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let created: SessionCreated = resp.json().await?;
        debug!(session = %created.id, "render session created");
        Ok(created.id)
    }

    pub async fn goto(
        &self,
        session: &str,
        request: &GotoRequest,
    ) -> Result<RenderedPage, ExtractorError> {
        debug!(session, url = %request.url, "render goto");
        let resp = self
            .client
            .post(self.endpoint(&format!("/sessions/{session}/goto")))
            .json(request)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn close_session(&self, session: &str) -> Result<(), ExtractorError> {
        let resp = self
            .client
            .delete(self.endpoint(&format!("/sessions/{session}")))
            .send()
            .await?;
        Self::check(resp).await?;
        debug!(session, "render session closed");
        Ok(())
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ExtractorError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ExtractorError::UpstreamError(format!(
            "render service {status}: {message}"
        )))
    }
}
