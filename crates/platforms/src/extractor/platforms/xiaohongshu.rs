use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::{
    extractor::{
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
        utils::{capture_group_1, parse_abbreviated},
    },
    profile::ProfileInfo,
};

// Fan counts appear either as plain integers or abbreviated ("1.2万").
static FAN_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?\s*[万w]?)").unwrap());

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static SPAN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

const TITLE_SUFFIX: &str = "的个人主页";
const FAN_LABEL: &str = "粉丝";

pub struct Xiaohongshu {
    pub extractor: Extractor,
    base_url: String,
}

impl Xiaohongshu {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    const AVATAR_PLACEHOLDER: &str = "/static/xiaohongshu.png";

    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            extractor: Extractor::new("Xiaohongshu", client),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn parse_page(body: &str, user_id: &str) -> Result<ProfileInfo, ExtractorError> {
        let document = Html::parse_document(body);

        let nickname = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| title.text().collect::<String>())
            .and_then(|text| {
                let name = text.split(TITLE_SUFFIX).next().unwrap_or("").trim().to_string();
                (!name.is_empty()).then_some(name)
            })
            .unwrap_or_else(|| user_id.to_string());

        let followers = document
            .select(&SPAN_SELECTOR)
            .filter_map(|span| {
                let text: String = span.text().collect();
                if !text.contains(FAN_LABEL) {
                    return None;
                }
                capture_group_1(&FAN_COUNT_REGEX, &text)
                    .and_then(|raw| parse_abbreviated(&raw.replace(' ', "")))
            })
            .next()
            .ok_or_else(|| {
                debug!(user_id, "no fan count span on profile page");
                ExtractorError::ParseError(
                    "could not parse fan count; page structure may have changed".to_string(),
                )
            })?;

        Ok(ProfileInfo::builder(nickname, followers)
            .avatar_url(Self::AVATAR_PLACEHOLDER)
            .build())
    }
}

#[async_trait]
impl PlatformExtractor for Xiaohongshu {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let url = format!(
            "{}/user/{}",
            self.base_url,
            urlencoding::encode(identifier)
        );
        let response = self
            .extractor
            .get(&url)
            .timeout(Self::REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractorError::UpstreamError(format!(
                "page inaccessible (status {})",
                response.status().as_u16()
            )));
        }

        let body = response.text().await?;
        Self::parse_page(&body, identifier)
    }
}
