use axum::{
    extract::{OriginalUri, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::warn;

/// HMAC token auth for administrator routes.
///
/// Clients send `x-auth-token: <hex>` where hex = HMAC_SHA256(secret, path).
/// `path` is the full request path (`/api/...`), not the nested remainder.
/// The query string is not part of the MAC, so one token per route suffices.
pub type HmacSha256 = Hmac<Sha256>;

pub const AUTH_HEADER: &str = "x-auth-token";

#[derive(Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    pub secret: Arc<Vec<u8>>,
}

impl AuthConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, secret: Arc::new(vec![]) }
    }

    pub fn new(secret: Vec<u8>) -> Self {
        Self { enabled: true, secret: Arc::new(secret) }
    }

    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(s) => Self::new(s.as_bytes().to_vec()),
            None => Self::disabled(),
        }
    }

    /// Token a client must present for `path`.
    pub fn token_for(&self, path: &str) -> Option<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(path.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    fn accepts(&self, path: &str, token: &str) -> bool {
        let Ok(raw) = hex::decode(token) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(path.as_bytes());
        mac.verify_slice(&raw).is_ok()
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "message": message }))).into_response()
}

pub async fn require_hmac(State(auth): State<Arc<AuthConfig>>, req: Request, next: Next) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }
    // nesting strips `/api` from `req.uri()`; the token covers the full route
    let path = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_string(),
        None => req.uri().path().to_string(),
    };
    let token = req.headers().get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    match token {
        None => {
            warn!(path = %path, "missing admin token");
            unauthorized("admin token required")
        }
        Some(t) if !auth.accepts(&path, t) => {
            warn!(path = %path, "invalid admin token");
            unauthorized("invalid admin token")
        }
        Some(_) => next.run(req).await,
    }
}
