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
        utils::{capture_group_1, strip_separators},
    },
    profile::ProfileInfo,
};

// Channel preview pages label the count "subscribers"; public groups and
// some older channels use "members".
static CHANNEL_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,.]*)\s+(?:subscribers|members)").unwrap());
static GROUP_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,.]*)\s+members").unwrap());

static OG_TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static EXTRA_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.tgme_page_extra").unwrap());
static PHOTO_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.tgme_page_photo_image").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramKind {
    Channel,
    Group,
}

pub struct Telegram {
    pub extractor: Extractor,
    base_url: String,
    kind: TelegramKind,
}

impl Telegram {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    const AVATAR_PLACEHOLDER: &str = "/static/telegram.png";

    pub fn new(client: Client, base_url: &str, kind: TelegramKind) -> Self {
        Self {
            extractor: Extractor::new("Telegram", client),
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
        }
    }

    fn parse_page(&self, body: &str, slug: &str) -> Result<ProfileInfo, ExtractorError> {
        let document = Html::parse_document(body);

        let title = document
            .select(&OG_TITLE_SELECTOR)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string)
            .unwrap_or_else(|| slug.to_string());

        let Some(extra) = document.select(&EXTRA_SELECTOR).next() else {
            return Err(ExtractorError::ParseError(
                "count container missing; page structure may have changed".to_string(),
            ));
        };
        let extra_text: String = extra.text().collect();

        let count_regex = match self.kind {
            TelegramKind::Channel => &CHANNEL_COUNT_REGEX,
            TelegramKind::Group => &GROUP_COUNT_REGEX,
        };
        let followers = capture_group_1(count_regex, &extra_text)
            .and_then(|raw| strip_separators(raw).parse::<u64>().ok())
            .ok_or_else(|| {
                debug!(text = %extra_text.trim(), "no count in page extra");
                ExtractorError::ParseError(
                    "could not parse member count; page structure may have changed".to_string(),
                )
            })?;

        let avatar = document
            .select(&PHOTO_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or(Self::AVATAR_PLACEHOLDER);

        Ok(ProfileInfo::builder(title, followers)
            .avatar_url(avatar)
            .build())
    }
}

#[async_trait]
impl PlatformExtractor for Telegram {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let slug = identifier.trim_start_matches('@');
        if slug.is_empty() {
            return Err(ExtractorError::ValidationError(
                "channel name must not be empty".to_string(),
            ));
        }

        let url = format!("{}/s/{}", self.base_url, urlencoding::encode(slug));
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
        self.parse_page(&body, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(kind: TelegramKind) -> Telegram {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        Telegram::new(Client::new(), "https://t.me", kind)
    }

    #[test]
    fn test_parse_channel_page() {
        let body = r#"
            <html><head>
            <meta property="og:title" content="Example Channel">
            </head><body>
            <img class="tgme_page_photo_image" src="https://cdn.example.org/photo.jpg">
            <div class="tgme_page_extra">12,345 subscribers</div>
            </body></html>
        "#;

        let info = channel(TelegramKind::Channel)
            .parse_page(body, "example")
            .unwrap();
        assert_eq!(info.username, "Example Channel");
        assert_eq!(info.followers, 12_345);
        assert_eq!(
            info.avatar_url.as_deref(),
            Some("https://cdn.example.org/photo.jpg")
        );
    }

    #[test]
    fn test_parse_group_page_falls_back_to_slug_and_placeholder() {
        let body = r#"<div class="tgme_page_extra">678 members, 12 online</div>"#;

        let info = channel(TelegramKind::Group)
            .parse_page(body, "mygroup")
            .unwrap();
        assert_eq!(info.username, "mygroup");
        assert_eq!(info.followers, 678);
        assert_eq!(info.avatar_url.as_deref(), Some("/static/telegram.png"));
    }

    #[test]
    fn test_group_rejects_subscriber_label() {
        let body = r#"<div class="tgme_page_extra">678 subscribers</div>"#;

        let err = channel(TelegramKind::Group)
            .parse_page(body, "mygroup")
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ParseError(_)));
    }

    #[test]
    fn test_missing_container_is_a_parse_error() {
        let err = channel(TelegramKind::Channel)
            .parse_page("<html><body>nothing here</body></html>", "example")
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ParseError(_)));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch() {
        let telegram = Telegram::new(
            crate::extractor::default::default_client(),
            "https://t.me",
            TelegramKind::Channel,
        );
        let info = telegram.fetch("telegram").await;
        println!("{info:?}");
    }

    #[test]
    fn test_european_thousands_separator() {
        let body = r#"<div class="tgme_page_extra">12.345 subscribers</div>"#;

        let info = channel(TelegramKind::Channel)
            .parse_page(body, "example")
            .unwrap();
        assert_eq!(info.followers, 12_345);
    }
}
