use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    extractor::{
        dispatcher::Platform,
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
    },
    profile::ProfileInfo,
    store::CredentialStore,
};

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    error: Option<ApiError>,
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Channel {
    snippet: Snippet,
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    // The Data API reports the count as a decimal string.
    subscriber_count: String,
}

pub struct Youtube {
    pub extractor: Extractor,
    api_base: String,
    credentials: Arc<dyn CredentialStore>,
}

impl Youtube {
    const CHANNELS_PATH: &str = "/youtube/v3/channels";

    pub fn new(client: Client, api_base: &str, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            extractor: Extractor::new("YouTube", client),
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl PlatformExtractor for Youtube {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let Some(api_key) = self.credentials.api_key(Platform::Youtube)? else {
            return Err(ExtractorError::ConfigurationError(
                "YouTube API key is not configured; set it before querying".to_string(),
            ));
        };

        let url = format!("{}{}", self.api_base, Self::CHANNELS_PATH);
        let response = self
            .extractor
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", identifier),
                ("key", &api_key),
            ])
            .send()
            .await?;
        let json: ChannelListResponse = response.json().await?;

        if let Some(error) = json.error {
            return Err(ExtractorError::UpstreamError(format!(
                "YouTube API error: {}",
                error.message
            )));
        }

        let Some(channel) = json.items.into_iter().next() else {
            return Err(ExtractorError::UpstreamError(
                "channel not found; check the channel ID".to_string(),
            ));
        };

        let followers = channel
            .statistics
            .subscriber_count
            .parse::<u64>()
            .map_err(|_| {
                ExtractorError::ParseError(format!(
                    "unexpected subscriber count '{}'",
                    channel.statistics.subscriber_count
                ))
            })?;

        Ok(ProfileInfo::builder(channel.snippet.title, followers)
            .avatar_url_opt(channel.snippet.thumbnails.default.map(|t| t.url))
            .build())
    }
}
