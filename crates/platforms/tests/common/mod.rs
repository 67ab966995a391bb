#![allow(dead_code)]

use std::sync::Arc;

use platforms_metrics::extractor::default_client;
use platforms_metrics::extractor::dispatcher::{Dispatcher, Endpoints};
use platforms_metrics::store::{CookieStore, CredentialStore, MemoryCookieStore, MemoryCredentialStore};

/// Endpoint table with every upstream pointed at the given mock server.
/// `douyin_base` stays a plain URL string: the render service receives
/// it inside request payloads and never resolves it in tests.
pub fn endpoints(uri: &str) -> Endpoints {
    Endpoints {
        bilibili_api: uri.to_string(),
        youtube_api: uri.to_string(),
        twitter_api: uri.to_string(),
        telegram_base: uri.to_string(),
        xiaohongshu_base: uri.to_string(),
        douyin_base: "https://www.douyin.com".to_string(),
        renderer: uri.to_string(),
        renderer_token: None,
    }
}

pub fn dispatcher(uri: &str) -> Dispatcher {
    dispatcher_with(
        uri,
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemoryCookieStore::new()),
    )
}

pub fn dispatcher_with(
    uri: &str,
    credentials: Arc<dyn CredentialStore>,
    jar: Arc<dyn CookieStore>,
) -> Dispatcher {
    Dispatcher::new(credentials, jar)
        .with_client(default_client())
        .with_endpoints(endpoints(uri))
}
