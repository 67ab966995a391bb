use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::{
    extractor::{
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
        utils::{capture_group_1, parse_abbreviated},
    },
    profile::ProfileInfo,
    renderer::RenderClient,
    store::CookieStore,
};

use super::session::{BrowserSession, SessionConfig};

static FAN_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?\s*[万w]?)").unwrap());

static FANS_CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-e2e="user-info-fans"]"#).unwrap());
static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span, div").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

const FAN_LABEL: &str = "粉丝";
const TITLE_SUFFIX: &str = "的抖音";

/// Douyin reports no usable numbers without client-side rendering, so
/// this adapter drives a remote browser session instead of plain HTTP.
/// Unlike the other adapters the upstream "value" is a raw abbreviated
/// string read off the rendered DOM; normalization to [`ProfileInfo`]
/// still happens here, behind the same fetch contract.
pub struct Douyin {
    pub extractor: Extractor,
    renderer: RenderClient,
    jar: Arc<dyn CookieStore>,
    base_url: String,
    config: SessionConfig,
}

impl Douyin {
    const AVATAR_PLACEHOLDER: &str = "/static/douyin.png";
    const FANS_WAIT_SELECTOR: &str = r#"[data-e2e="user-info-fans"]"#;

    pub fn new(
        client: Client,
        renderer: RenderClient,
        jar: Arc<dyn CookieStore>,
        base_url: &str,
        config: SessionConfig,
    ) -> Self {
        Self {
            extractor: Extractor::new("Douyin", client),
            renderer,
            jar,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    async fn run(
        &self,
        session: &mut BrowserSession,
        identifier: &str,
    ) -> Result<ProfileInfo, ExtractorError> {
        session.restore().await?;

        let profile_url = format!(
            "{}/user/{}",
            self.base_url,
            urlencoding::encode(identifier)
        );
        let html = session
            .navigate(&profile_url, Self::FANS_WAIT_SELECTOR)
            .await?;

        Self::parse_profile(&html, identifier)
    }

    fn parse_profile(html: &str, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let document = Html::parse_document(html);

        let fans_text = extract_fans_text(&document).ok_or_else(|| {
            ExtractorError::ParseError(
                "fan count element not found; page structure may have changed".to_string(),
            )
        })?;
        let followers = parse_abbreviated(&fans_text.replace(' ', "")).ok_or_else(|| {
            ExtractorError::ParseError(format!("unparseable fan count '{fans_text}'"))
        })?;

        let username = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| title.text().collect::<String>())
            .and_then(|text| {
                let name = text.split(TITLE_SUFFIX).next().unwrap_or("").trim().to_string();
                (!name.is_empty()).then_some(name)
            })
            .unwrap_or_else(|| identifier.to_string());

        Ok(ProfileInfo::builder(username, followers)
            .avatar_url(Self::AVATAR_PLACEHOLDER)
            .build())
    }
}

/// The count container is tagged `data-e2e="user-info-fans"`; when the
/// tag is absent (layout experiments), fall back to the count node
/// adjacent to a bare "粉丝" label.
fn extract_fans_text(document: &Html) -> Option<String> {
    for container in document.select(&FANS_CONTAINER_SELECTOR) {
        let text: String = container.text().collect();
        if let Some(token) = capture_group_1(&FAN_COUNT_REGEX, &text) {
            return Some(token.to_string());
        }
    }

    for label in document.select(&LABEL_SELECTOR) {
        let own_text: String = label.text().collect();
        if own_text.trim() != FAN_LABEL {
            continue;
        }
        if let Some(token) = sibling_count_text(label) {
            return Some(token);
        }
    }

    None
}

fn sibling_count_text(label: ElementRef<'_>) -> Option<String> {
    let node = *label;
    for sibling in node.prev_siblings().chain(node.next_siblings()) {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        let text: String = element.text().collect();
        if let Some(token) = capture_group_1(&FAN_COUNT_REGEX, text.trim()) {
            return Some(token.to_string());
        }
    }
    None
}

#[async_trait]
impl PlatformExtractor for Douyin {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn fetch(&self, identifier: &str) -> Result<ProfileInfo, ExtractorError> {
        let mut session = BrowserSession::new(
            self.renderer.clone(),
            Arc::clone(&self.jar),
            self.config.clone(),
            format!("{}/", self.base_url),
        );

        // Launch; if this fails there is nothing to tear down yet.
        session.launch().await?;

        let outcome = self.run(&mut session, identifier).await;

        // Teardown runs on every exit path so a parse failure can never
        // leak a browser context.
        session.close().await;

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_with_tagged_container() {
        let html = r#"
            <html><head><title>某主播的抖音 - 抖音</title></head>
            <body><div data-e2e="user-info-fans"><div>7.5w</div>粉丝</div></body></html>
        "#;

        let info = Douyin::parse_profile(html, "MS4wLjABAAAA").unwrap();
        assert_eq!(info.username, "某主播");
        assert_eq!(info.followers, 75_000);
        assert_eq!(info.avatar_url.as_deref(), Some("/static/douyin.png"));
    }

    #[test]
    fn test_parse_profile_with_label_sibling() {
        let html = r#"
            <body><div><span>1,234</span><span>粉丝</span></div></body>
        "#;

        let info = Douyin::parse_profile(html, "MS4wLjABAAAA").unwrap();
        assert_eq!(info.username, "MS4wLjABAAAA");
        assert_eq!(info.followers, 1_234);
    }

    #[test]
    fn test_missing_fan_element_is_a_parse_error() {
        let err = Douyin::parse_profile("<body><div>nothing</div></body>", "x").unwrap_err();
        assert!(matches!(err, ExtractorError::ParseError(_)));
    }
}
