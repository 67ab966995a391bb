//! Remote browser session lifecycle for the Douyin adapter.
//!
//! The flow is a small state machine: Launch → RestoreSession →
//! (LoggedIn | NeedsLogin) → Navigate → Extract → Teardown. Login is
//! out-of-band (a human scans the code in the rendered page with the
//! companion app), so NeedsLogin polls the landing page until the
//! prompt clears, bounded by a configurable deadline, instead of
//! sleeping a fixed window. With no deadline configured a login prompt
//! fails immediately (unattended mode).

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::extractor::error::ExtractorError;
use crate::renderer::{GotoRequest, RenderClient, RenderedPage, SessionOptions};
use crate::store::{Cookie, CookieStore};

static LOGIN_PANEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[id^="login-full-panel"], [data-e2e="login-guide"]"#).unwrap()
});

const LOGIN_PROMPT_TEXT: &str = "扫码登录";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub options: SessionOptions,
    /// How long to wait for an out-of-band login before giving up.
    /// `None` means unattended operation: a login prompt is an
    /// immediate failure.
    pub login_deadline: Option<Duration>,
    pub login_poll_interval: Duration,
    /// Upper bound the render service gets for navigation plus the
    /// wait-for-selector condition.
    pub navigation_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            options: SessionOptions::default(),
            login_deadline: None,
            login_poll_interval: Duration::from_secs(3),
            navigation_timeout: Duration::from_secs(15),
        }
    }
}

/// One remote browser context, alive from `launch` until `close`.
///
/// The cookie jar outlives the session: it is restored before the first
/// navigation and overwritten only after a fresh login.
pub struct BrowserSession {
    renderer: RenderClient,
    jar: Arc<dyn CookieStore>,
    config: SessionConfig,
    landing_url: String,
    id: Option<String>,
    cookies: Vec<Cookie>,
}

impl BrowserSession {
    pub fn new(
        renderer: RenderClient,
        jar: Arc<dyn CookieStore>,
        config: SessionConfig,
        landing_url: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            jar,
            config,
            landing_url: landing_url.into(),
            id: None,
            cookies: Vec::new(),
        }
    }

    /// Launch: start the isolated browser context.
    pub async fn launch(&mut self) -> Result<(), ExtractorError> {
        let id = self.renderer.create_session(&self.config.options).await?;
        self.id = Some(id);
        Ok(())
    }

    fn session_id(&self) -> Result<&str, ExtractorError> {
        self.id.as_deref().ok_or_else(|| {
            ExtractorError::ValidationError("browser session not launched".to_string())
        })
    }

    /// RestoreSession + login check: load the persisted jar, open the
    /// landing page, and if a login prompt is shown wait for it to clear
    /// within the configured deadline.
    pub async fn restore(&mut self) -> Result<(), ExtractorError> {
        if let Some(jar) = self.jar.load()? {
            debug!(cookies = jar.len(), "restoring persisted cookie jar");
            self.cookies = jar;
        }

        let page = self.goto_landing().await?;
        if !needs_login(&page.html) {
            self.cookies = page.cookies;
            return Ok(());
        }

        let Some(deadline) = self.config.login_deadline else {
            return Err(ExtractorError::ConfigurationError(
                "login required: run an attended login to refresh the cookie jar".to_string(),
            ));
        };

        info!("login prompt detected, waiting for the code to be scanned");
        let started = tokio::time::Instant::now();
        loop {
            if started.elapsed() >= deadline {
                return Err(ExtractorError::UpstreamError(
                    "login window expired before the code was scanned".to_string(),
                ));
            }
            tokio::time::sleep(self.config.login_poll_interval).await;

            let page = self.goto_landing().await?;
            if !needs_login(&page.html) {
                // Fresh login: overwrite the jar for future invocations.
                self.jar.save(&page.cookies)?;
                self.cookies = page.cookies;
                info!("login confirmed, cookie jar refreshed");
                return Ok(());
            }
        }
    }

    async fn goto_landing(&self) -> Result<RenderedPage, ExtractorError> {
        self.renderer
            .goto(
                self.session_id()?,
                &GotoRequest {
                    url: self.landing_url.clone(),
                    wait_for: Some("body".to_string()),
                    wait_timeout_ms: Some(self.config.navigation_timeout.as_millis() as u64),
                    cookies: self.cookies.clone(),
                },
            )
            .await
    }

    /// Navigate: load `url` and wait for `wait_for` to appear so
    /// client-side rendering has settled before extraction.
    pub async fn navigate(&mut self, url: &str, wait_for: &str) -> Result<String, ExtractorError> {
        let page = self
            .renderer
            .goto(
                self.session_id()?,
                &GotoRequest {
                    url: url.to_string(),
                    wait_for: Some(wait_for.to_string()),
                    wait_timeout_ms: Some(self.config.navigation_timeout.as_millis() as u64),
                    cookies: self.cookies.clone(),
                },
            )
            .await?;
        self.cookies = page.cookies;
        Ok(page.html)
    }

    /// Teardown: terminate the browser context. Called on every exit
    /// path; a failed close is logged, never propagated over the fetch
    /// outcome.
    pub async fn close(&mut self) {
        if let Some(id) = self.id.take()
            && let Err(e) = self.renderer.close_session(&id).await
        {
            warn!(error = %e, "failed to close render session");
        }
    }
}

/// A landing page that still shows the login panel or QR prompt means
/// the restored cookies are absent or expired.
pub(crate) fn needs_login(html: &str) -> bool {
    if html.contains(LOGIN_PROMPT_TEXT) {
        return true;
    }
    let document = Html::parse_document(html);
    document.select(&LOGIN_PANEL_SELECTOR).next().is_some()
}
