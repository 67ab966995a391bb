//! Dispatch-boundary properties: invalid queries fail fast as results,
//! with no outbound traffic of any kind.

mod common;

use wiremock::MockServer;

#[tokio::test]
async fn blank_identifier_fails_without_any_network_call() {
    let server = MockServer::start().await;
    let dispatcher = common::dispatcher(&server.uri());

    for platform in [
        "bilibili",
        "youtube",
        "twitter",
        "telegram",
        "telegram_group",
        "xiaohongshu",
        "douyin",
    ] {
        let result = dispatcher.get_followers(platform, "").await;
        assert!(!result.success, "{platform} accepted an empty identifier");
        assert!(result.username.is_none());
        assert!(result.follower.is_none());
    }

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.is_empty(),
        "expected zero upstream requests, saw {}",
        requests.len()
    );
}

#[tokio::test]
async fn unrecognized_platform_fails_without_any_network_call() {
    let server = MockServer::start().await;
    let dispatcher = common::dispatcher(&server.uri());

    let result = dispatcher.get_followers("myspace", "someone").await;
    assert!(!result.success);
    assert!(
        result.message.as_deref().unwrap().contains("unsupported platform"),
        "unexpected message: {:?}",
        result.message
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unimplemented_platforms_fail_without_any_network_call() {
    let server = MockServer::start().await;
    let dispatcher = common::dispatcher(&server.uri());

    for platform in ["kuaishou", "wechat_mp", "wechat_video"] {
        let result = dispatcher.get_followers(platform, "someone").await;
        assert!(!result.success);
        assert!(result.message.as_deref().unwrap().contains("not implemented"));
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}
