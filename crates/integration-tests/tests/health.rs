//! Health endpoint tests.
//!
//! Require a running game server.

use outpost_integration_tests::TestContext;
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running game server"]
async fn test_liveness() {
    let ctx = TestContext::new();
    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to call /health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running game server and database"]
async fn test_readiness() {
    let ctx = TestContext::new();
    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Failed to call /health/ready");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}
