//! Axum router configuration for the honeypot endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use secrecy::Secret;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{chat, health, service_info, stats, HoneypotAppState};
use crate::adapters::http::middleware::{api_key_middleware, ApiKeyState};

/// Cross-cutting settings for the public router.
#[derive(Debug)]
pub struct RouterOptions {
    pub api_key: Secret<String>,
    pub request_timeout: Duration,
    /// Allowed CORS origins; any origin when empty.
    pub cors_origins: Vec<String>,
}

impl RouterOptions {
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let allow_origin = if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Create the honeypot routes.
///
/// # Routes
/// - `GET /` - Service description (no key)
/// - `GET /health` - Liveness (no key)
/// - `POST /chat` - Turn endpoint
/// - `GET /stats` - Active conversation count
pub fn honeypot_routes() -> Router<HoneypotAppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/stats", get(stats))
}

/// Create the complete application router with authentication, CORS,
/// request timeout and request tracing applied.
///
/// The turn budget in `state` is capped below `request_timeout`.
pub fn honeypot_router(state: HoneypotAppState, options: RouterOptions) -> Router {
    let cors = options.cors_layer();
    let api_key: ApiKeyState = Arc::new(options.api_key);
    let state = state.bounded_by(options.request_timeout);

    honeypot_routes()
        .with_state(state)
        .layer(middleware::from_fn_with_state(api_key, api_key_middleware))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
