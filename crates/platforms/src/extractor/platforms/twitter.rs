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
struct UserResponse {
    errors: Option<Vec<ApiError>>,
    data: Option<User>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: String,
    #[serde(default)]
    profile_image_url: Option<String>,
    public_metrics: PublicMetrics,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    followers_count: u64,
}

pub struct Twitter {
    pub extractor: Extractor,
    api_base: String,
    credentials: Arc<dyn CredentialStore>,
}

impl Twitter {
    pub fn new(client: Client, api_base: &str, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            extractor: Extractor::new("Twitter", client),
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl PlatformExtractor for Twitter {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let Some(bearer) = self.credentials.api_key(Platform::Twitter)? else {
            return Err(ExtractorError::ConfigurationError(
                "Twitter bearer token is not configured; set it before querying".to_string(),
            ));
        };

        let handle = identifier.trim_start_matches('@');
        let url = format!(
            "{}/2/users/by/username/{}",
            self.api_base,
            urlencoding::encode(handle)
        );
        let response = self
            .extractor
            .get(&url)
            .query(&[("user.fields", "profile_image_url,public_metrics")])
            .bearer_auth(&bearer)
            .send()
            .await?;
        let json: UserResponse = response.json().await?;

        if let Some(errors) = json.errors
            && let Some(first) = errors.into_iter().next()
        {
            let message = first
                .message
                .or(first.detail)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ExtractorError::UpstreamError(format!(
                "Twitter API error: {message}"
            )));
        }

        let Some(user) = json.data else {
            return Err(ExtractorError::UpstreamError(
                "user not found".to_string(),
            ));
        };

        Ok(
            ProfileInfo::builder(user.name, user.public_metrics.followers_count)
                .avatar_url_opt(user.profile_image_url)
                .build(),
        )
    }
}
