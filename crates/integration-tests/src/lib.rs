//! Integration tests for the Outpost game server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p outpost-cli -- migrate
//! cargo run -p outpost-server &
//! cargo test -p outpost-integration-tests -- --ignored
//! ```
//!
//! `OUTPOST_TEST_URL` selects the server (default `http://localhost:3000`);
//! tests that seed data directly read `OUTPOST_DATABASE_URL`.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::{Client, Response};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "integration-pass-1";

/// One simulated game client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        let base_url = std::env::var("OUTPOST_TEST_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());

        Self { client, base_url }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Register a fresh player and keep its session cookie.
    ///
    /// Returns the registration response body.
    pub async fn register_player(&self) -> Value {
        let resp = self
            .client
            .post(self.url("/api/player/register"))
            .json(&json!({ "username": unique_username(), "password": TEST_PASSWORD }))
            .send()
            .await
            .expect("Failed to register player");

        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.expect("Invalid register response")
    }

    /// `POST /api/base/load`.
    pub async fn load_base(&self, mode: &str, baseid: &str) -> Response {
        self.client
            .post(self.url("/api/base/load"))
            .json(&json!({ "type": mode, "userid": "", "baseid": baseid, "cellid": "" }))
            .send()
            .await
            .expect("Failed to load base")
    }

    /// Load the player's own base, creating it on first use.
    pub async fn own_base(&self) -> Value {
        let resp = self.load_base("build", "0").await;
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.json().await.expect("Invalid base load response")
    }
}

/// A username no other test run will use.
#[must_use]
pub fn unique_username() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("it_{}", &suffix[..12])
}

/// Connect to the game database for seeding.
pub async fn database() -> PgPool {
    let url = std::env::var("OUTPOST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("OUTPOST_DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}
