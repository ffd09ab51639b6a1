use axum::http::HeaderMap;
use serde::Deserialize;

use crate::{auth::verify_jwt, chat::chat_error::ChatError, error::Result, state::AppState};

/// Identity bound to a connection. Created at most once per connection and
/// passed into frame handling; never looked up globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct WsConnectQuery {
    pub access_token: Option<String>,
}

/// Validate a bearer token and resolve it to a principal. The user must
/// still exist; a valid token for a deleted account binds nothing.
pub async fn resolve_token(state: &AppState, token: &str) -> Result<Principal> {
    let claims =
        verify_jwt(token, &state.config.jwt_secret).map_err(|_| ChatError::WebSocketUnauthorized)?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ChatError::WebSocketUnauthorized)?;

    state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(ChatError::WebSocketUnauthorized)?;

    Ok(Principal { user_id })
}

/// Best-effort identity resolution at handshake time, from the
/// `access_token` query parameter or the `Authorization: Bearer` header.
///
/// A missing or invalid credential does not refuse the upgrade: the
/// connection is established unauthenticated and the frame gate rejects
/// every authorized frame until a `connect` frame binds an identity. This
/// keeps handshake failures out of raw transport errors and gives clients
/// a structured error to react to instead.
pub async fn resolve_handshake(
    state: &AppState,
    query: &WsConnectQuery,
    headers: &HeaderMap,
) -> Option<Principal> {
    let token = query.access_token.clone().or_else(|| {
        headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })?;

    match resolve_token(state, &token).await {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::warn!("handshake token rejected: {err}");
            None
        }
    }
}
