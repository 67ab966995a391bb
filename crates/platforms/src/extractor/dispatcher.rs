use std::str::FromStr;
use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::{ProfileInfo, ProfileResult};
use crate::renderer::RenderClient;
use crate::store::{CookieStore, CredentialStore};

use super::default::default_client;
use super::error::ExtractorError;
use super::platform_extractor::PlatformExtractor;
use super::platforms::bilibili::Bilibili;
use super::platforms::douyin::{Douyin, SessionConfig};
use super::platforms::telegram::{Telegram, TelegramKind};
use super::platforms::twitter::Twitter;
use super::platforms::xiaohongshu::Xiaohongshu;
use super::platforms::youtube::Youtube;

/// The closed set of platforms a query can name.
///
/// Adding a platform is a compile-time-checked extension: the dispatch
/// match below is exhaustive, so a new variant fails the build until it
/// is routed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    Bilibili,
    Youtube,
    Twitter,
    Telegram,
    TelegramGroup,
    Xiaohongshu,
    Douyin,
    Kuaishou,
    WechatMp,
    WechatVideo,
}

/// One follower lookup: which platform, and the platform-scoped account
/// identifier (numeric UID, handle, or channel slug; semantics vary by
/// platform and are validated by the adapter, not here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileQuery {
    pub platform: Platform,
    pub identifier: String,
}

/// Upstream endpoint table, keyed by platform.
///
/// Defaults are the real services; tests point individual entries at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub bilibili_api: String,
    pub youtube_api: String,
    pub twitter_api: String,
    pub telegram_base: String,
    pub xiaohongshu_base: String,
    pub douyin_base: String,
    pub renderer: String,
    pub renderer_token: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bilibili_api: "https://api.bilibili.com".to_string(),
            youtube_api: "https://www.googleapis.com".to_string(),
            twitter_api: "https://api.twitter.com".to_string(),
            telegram_base: "https://t.me".to_string(),
            xiaohongshu_base: "https://www.xiaohongshu.com".to_string(),
            douyin_base: "https://www.douyin.com".to_string(),
            renderer: "http://127.0.0.1:3000".to_string(),
            renderer_token: None,
        }
    }
}

/// Routes a `(platform, identifier)` pair to the matching adapter and
/// flattens whatever happens into a [`ProfileResult`].
///
/// One query is handled synchronously end-to-end: no retries, no
/// caching, no cross-query coordination. Collaborators are injected at
/// construction so tests can substitute in-memory stores and mock
/// endpoints.
pub struct Dispatcher {
    client: Client,
    credentials: Arc<dyn CredentialStore>,
    cookie_jar: Arc<dyn CookieStore>,
    endpoints: Endpoints,
    session_config: SessionConfig,
}

impl Dispatcher {
    pub fn new(credentials: Arc<dyn CredentialStore>, cookie_jar: Arc<dyn CookieStore>) -> Self {
        Self {
            client: default_client(),
            credentials,
            cookie_jar,
            endpoints: Endpoints::default(),
            session_config: SessionConfig::default(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Caller-facing entry point: platform arrives as a string from the
    /// outer layer and an unrecognized value is a failure result, not a
    /// fault.
    pub async fn get_followers(&self, platform: &str, identifier: &str) -> ProfileResult {
        let Ok(platform) = Platform::from_str(platform) else {
            debug!(platform, "unrecognized platform");
            return ProfileResult::from(Err::<ProfileInfo, _>(
                ExtractorError::PlatformNotSupported,
            ));
        };

        self.dispatch(&ProfileQuery {
            platform,
            identifier: identifier.to_string(),
        })
        .await
    }

    pub async fn dispatch(&self, query: &ProfileQuery) -> ProfileResult {
        ProfileResult::from(self.run(query).await)
    }

    async fn run(&self, query: &ProfileQuery) -> Result<ProfileInfo, ExtractorError> {
        let identifier = query.identifier.trim();
        if identifier.is_empty() {
            return Err(ExtractorError::ValidationError(
                "identifier must not be empty".to_string(),
            ));
        }

        debug!(platform = %query.platform, identifier, "dispatching query");

        let adapter: Box<dyn PlatformExtractor> = match query.platform {
            Platform::Bilibili => Box::new(Bilibili::new(
                self.client.clone(),
                &self.endpoints.bilibili_api,
            )),
            Platform::Youtube => Box::new(Youtube::new(
                self.client.clone(),
                &self.endpoints.youtube_api,
                Arc::clone(&self.credentials),
            )),
            Platform::Twitter => Box::new(Twitter::new(
                self.client.clone(),
                &self.endpoints.twitter_api,
                Arc::clone(&self.credentials),
            )),
            Platform::Telegram => Box::new(Telegram::new(
                self.client.clone(),
                &self.endpoints.telegram_base,
                TelegramKind::Channel,
            )),
            Platform::TelegramGroup => Box::new(Telegram::new(
                self.client.clone(),
                &self.endpoints.telegram_base,
                TelegramKind::Group,
            )),
            Platform::Xiaohongshu => Box::new(Xiaohongshu::new(
                self.client.clone(),
                &self.endpoints.xiaohongshu_base,
            )),
            Platform::Douyin => {
                let renderer = RenderClient::new(
                    self.client.clone(),
                    &self.endpoints.renderer,
                    self.endpoints.renderer_token.as_deref(),
                );
                Box::new(Douyin::new(
                    self.client.clone(),
                    renderer,
                    Arc::clone(&self.cookie_jar),
                    &self.endpoints.douyin_base,
                    self.session_config.clone(),
                ))
            }
            Platform::Kuaishou | Platform::WechatMp | Platform::WechatVideo => {
                return Err(ExtractorError::NotImplemented(query.platform));
            }
        };

        adapter.fetch(identifier).await
    }
}
