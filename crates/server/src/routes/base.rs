//! Base load route handler.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};

use outpost_core::BaseMode;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::base::{BaseLoadRequest, BaseLoader, BaseRef, build_response};
use crate::state::AppState;

/// An id the client may send as a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientId {
    Text(String),
    Number(i64),
}

impl ClientId {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Body of `POST /api/base/load`.
#[derive(Debug, Deserialize)]
pub struct BaseLoadBody {
    #[serde(rename = "type", default)]
    pub mode: BaseMode,
    /// Sent by the client; the session decides who the player is.
    #[serde(default)]
    pub userid: Option<ClientId>,
    pub baseid: ClientId,
    #[serde(default)]
    pub cellid: Option<ClientId>,
}

/// Load a base.
///
/// # Errors
///
/// Returns 400 for a malformed body or base id, 403/404 (`save_failure`)
/// when the base cannot be loaded, and 500 on storage failures.
pub async fn load(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    RequireAuth(player): RequireAuth,
    payload: std::result::Result<Json<BaseLoadBody>, JsonRejection>,
) -> Result<Json<Map<String, Value>>> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let raw_base_id = body.baseid.as_text();

    tracing::info!(
        user = %player.username,
        ip = %client_ip(&headers, peer),
        base_id = %raw_base_id,
        mode = %body.mode,
        cell_id = ?body.cellid,
        "Loading base"
    );

    let request = BaseLoadRequest {
        mode: body.mode,
        base: BaseRef::parse(&raw_base_id)?,
    };

    let loaded = BaseLoader::new(state.base_store())
        .load(player.id, request)
        .await?;

    if state.config().environment.is_local() {
        tracing::debug!(
            save = %serde_json::to_string_pretty(&loaded.save).unwrap_or_default(),
            "Base loaded"
        );
    }

    add_breadcrumb(
        "base",
        if loaded.created { "Created base" } else { "Loaded base" },
        Some(&[
            ("mode", body.mode.as_str()),
            ("base_id", &loaded.save.basesaveid.to_string()),
        ]),
    );

    let response = build_response(
        &loaded.save,
        state.game_data(),
        state.config().dev,
        Utc::now(),
    )?;

    Ok(Json(response))
}

/// Client address, preferring proxy headers over the socket peer.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    header_ip("cf-connecting-ip")
        .or_else(|| header_ip("x-forwarded-for"))
        .or_else(|| header_ip("x-real-ip"))
        .unwrap_or_else(|| peer.ip())
}
