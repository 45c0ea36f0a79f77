//! Shared-secret authentication middleware.
//!
//! Every request outside [`EXEMPT_PATHS`] must carry the configured key in
//! the `x-api-key` header. A missing header is answered with 401, a wrong
//! key with 403, both as JSON bodies.
//!
//! ```ignore
//! let key: ApiKeyState = Arc::new(Secret::new("127128".to_string()));
//! let app = Router::new()
//!     .route("/stats", get(stats))
//!     .layer(middleware::from_fn_with_state(key, api_key_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::config::API_KEY_HEADER;

/// Middleware state - the expected key.
pub type ApiKeyState = Arc<Secret<String>>;

/// Paths served without a key: info, liveness and API docs.
pub const EXEMPT_PATHS: &[&str] = &["/", "/health", "/docs", "/openapi.json"];

/// Rejects requests that do not present the shared secret.
pub async fn api_key_middleware(
    State(expected): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes())
        .filter(|value| !value.is_empty());

    let rejected = match provided {
        None => Some((StatusCode::UNAUTHORIZED, "Missing x-api-key header", "unauthorized")),
        Some(key) if key_matches(&expected, key) => None,
        Some(_) => Some((StatusCode::FORBIDDEN, "Invalid API key", "forbidden")),
    };

    match rejected {
        None => next.run(request).await,
        Some((status, error, label)) => {
            tracing::warn!(path = %request.uri().path(), %status, "request rejected by API key check");
            rejection(status, error, label)
        }
    }
}

fn key_matches(expected: &Secret<String>, provided: &[u8]) -> bool {
    expected.expose_secret().as_bytes().ct_eq(provided).into()
}

fn rejection(status: StatusCode, error: &'static str, label: &'static str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "status": label,
        })),
    )
        .into_response()
}
