//! Douyin rendered-DOM adapter against a mocked rendering service.
//!
//! The mock stands in for the Browserless-style session API, so these
//! tests cover the whole state machine: launch, cookie restore, login
//! detection, navigation, extraction, and teardown.

mod common;

use std::sync::Arc;
use std::time::Duration;

use platforms_metrics::extractor::platforms::douyin::SessionConfig;
use platforms_metrics::store::{Cookie, CookieStore, MemoryCookieStore, MemoryCredentialStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LANDING_URL: &str = "https://www.douyin.com/";
const PROFILE_URL: &str = "https://www.douyin.com/user/MS4wLjABAAAA";

const LOGGED_IN_LANDING: &str = r#"<html><body><div class="feed">推荐</div></body></html>"#;
const LOGIN_PROMPT_LANDING: &str = r#"<html><body><div>请使用手机扫码登录</div></body></html>"#;
const PROFILE_PAGE: &str = r#"
<html><head><title>某主播的抖音 - 抖音</title></head>
<body><div data-e2e="user-info-fans">1.2万粉丝</div></body></html>
"#;

async fn mount_session_lifecycle(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "id": "sess-1" })))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/sessions/sess-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .named("session teardown")
        .mount(server)
        .await;
}

fn goto_response(html: &str, cookies: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(&json!({ "html": html, "cookies": cookies }))
}

#[tokio::test]
async fn rendered_profile_is_extracted_and_normalized() {
    let server = MockServer::start().await;
    mount_session_lifecycle(&server).await;

    // The persisted jar must travel with the landing navigation.
    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({
            "url": LANDING_URL,
            "cookies": [{ "name": "ttwid", "value": "persisted" }]
        })))
        .respond_with(goto_response(LOGGED_IN_LANDING, json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": PROFILE_URL })))
        .respond_with(goto_response(PROFILE_PAGE, json!([])))
        .mount(&server)
        .await;

    let jar = Arc::new(MemoryCookieStore::with_cookies(vec![Cookie::new(
        "ttwid",
        "persisted",
    )]));
    let dispatcher = common::dispatcher_with(
        &server.uri(),
        Arc::new(MemoryCredentialStore::new()),
        jar,
    );

    let result = dispatcher.get_followers("douyin", "MS4wLjABAAAA").await;

    assert!(result.success, "unexpected failure: {:?}", result.message);
    assert_eq!(result.username.as_deref(), Some("某主播"));
    assert_eq!(result.follower, Some(12_000));
    assert_eq!(result.avatar.as_deref(), Some("/static/douyin.png"));

    server.verify().await;
}

#[tokio::test]
async fn missing_fan_element_fails_but_session_is_still_torn_down() {
    let server = MockServer::start().await;
    mount_session_lifecycle(&server).await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": LANDING_URL })))
        .respond_with(goto_response(LOGGED_IN_LANDING, json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": PROFILE_URL })))
        .respond_with(goto_response(
            "<html><body>layout experiment</body></html>",
            json!([]),
        ))
        .mount(&server)
        .await;

    let result = common::dispatcher(&server.uri())
        .get_followers("douyin", "MS4wLjABAAAA")
        .await;

    assert!(!result.success);
    assert!(result.message.as_deref().unwrap().contains("page structure"));

    // The `expect(1)` on DELETE proves no leaked session.
    server.verify().await;
}

#[tokio::test]
async fn unattended_mode_fails_fast_on_login_prompt() {
    let server = MockServer::start().await;
    mount_session_lifecycle(&server).await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": LANDING_URL })))
        .respond_with(goto_response(LOGIN_PROMPT_LANDING, json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": PROFILE_URL })))
        .respond_with(goto_response(PROFILE_PAGE, json!([])))
        .expect(0)
        .named("profile navigation")
        .mount(&server)
        .await;

    // Default SessionConfig has no login deadline: unattended operation.
    let result = common::dispatcher(&server.uri())
        .get_followers("douyin", "MS4wLjABAAAA")
        .await;

    assert!(!result.success);
    assert!(result.message.as_deref().unwrap().contains("login required"));

    server.verify().await;
}

#[tokio::test]
async fn attended_login_waits_for_the_prompt_to_clear_and_persists_the_jar() {
    let server = MockServer::start().await;
    mount_session_lifecycle(&server).await;

    // First landing render still shows the prompt; once it is exhausted the
    // logged-in mock below answers the polling renders.
    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": LANDING_URL })))
        .respond_with(goto_response(LOGIN_PROMPT_LANDING, json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": LANDING_URL })))
        .respond_with(goto_response(
            LOGGED_IN_LANDING,
            json!([{ "name": "sessionid", "value": "fresh" }]),
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sessions/sess-1/goto"))
        .and(body_partial_json(json!({ "url": PROFILE_URL })))
        .respond_with(goto_response(PROFILE_PAGE, json!([])))
        .mount(&server)
        .await;

    let jar = Arc::new(MemoryCookieStore::new());
    let dispatcher = common::dispatcher_with(
        &server.uri(),
        Arc::new(MemoryCredentialStore::new()),
        Arc::clone(&jar) as Arc<dyn CookieStore>,
    )
    .with_session_config(SessionConfig {
        login_deadline: Some(Duration::from_secs(5)),
        login_poll_interval: Duration::from_millis(10),
        ..SessionConfig::default()
    });

    let result = dispatcher.get_followers("douyin", "MS4wLjABAAAA").await;

    assert!(result.success, "unexpected failure: {:?}", result.message);
    assert_eq!(result.follower, Some(12_000));

    // Fresh login overwrote the jar for future invocations.
    let saved = jar.load().unwrap().expect("jar should have been saved");
    assert!(saved.iter().any(|c| c.name == "sessionid" && c.value == "fresh"));

    server.verify().await;
}
