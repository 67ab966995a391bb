use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    extractor::{
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
        platforms::bilibili::models::{Card, CardResponse, RelationStatResponse},
    },
    profile::ProfileInfo,
};

pub struct Bilibili {
    pub extractor: Extractor,
    api_base: String,
}

impl Bilibili {
    const BASE_URL: &str = "https://www.bilibili.com";

    const CARD_PATH: &str = "/x/web-interface/card";
    const RELATION_STAT_PATH: &str = "/x/relation/stat";

    pub fn new(client: Client, api_base: &str) -> Self {
        let mut extractor = Extractor::new("Bilibili", client);
        extractor.set_referer_static(Self::BASE_URL);

        Self {
            extractor,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn validate_uid(identifier: &str) -> Result<&str, ExtractorError> {
        if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
            Ok(identifier)
        } else {
            Err(ExtractorError::ValidationError(format!(
                "bilibili uid must be numeric, got '{identifier}'"
            )))
        }
    }

    async fn fetch_card(&self, uid: &str) -> Result<Card, ExtractorError> {
        let url = format!("{}{}", self.api_base, Self::CARD_PATH);
        let response = self.extractor.get(&url).query(&[("mid", uid)]).send().await?;
        let json: CardResponse = response.json().await?;

        if json.code != 0 {
            let message = if json.message.is_empty() {
                "failed to fetch user info".to_string()
            } else {
                json.message
            };
            return Err(ExtractorError::UpstreamError(message));
        }

        json.data
            .and_then(|data| data.card)
            .ok_or_else(|| ExtractorError::ParseError("no card data in response".to_string()))
    }

    /// Follower count from the relation endpoint. The card payload usually
    /// carries the fan count already; this is the fallback for responses
    /// that omit it.
    async fn relation_stat(&self, uid: &str) -> Result<u64, ExtractorError> {
        let url = format!("{}{}", self.api_base, Self::RELATION_STAT_PATH);
        let response = self
            .extractor
            .get(&url)
            .query(&[("vmid", uid)])
            .send()
            .await?;
        let json: RelationStatResponse = response.json().await?;

        if json.code != 0 {
            return Err(ExtractorError::UpstreamError(json.message));
        }

        json.data
            .map(|data| data.follower)
            .ok_or_else(|| ExtractorError::ParseError("no relation data in response".to_string()))
    }
}

#[async_trait]
impl PlatformExtractor for Bilibili {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let uid = Self::validate_uid(identifier)?;
        let card = self.fetch_card(uid).await?;

        let followers = match card.fans {
            Some(fans) => fans,
            None => {
                debug!(uid, "card payload missing fan count, using relation stat");
                self.relation_stat(uid).await?
            }
        };

        Ok(ProfileInfo::builder(card.name, followers)
            .avatar_url(card.face)
            .build())
    }
}
