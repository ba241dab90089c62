//! HTTP routing and shared handler state.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::FromRef,
    http::{HeaderMap, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use tower_http::trace::TraceLayer;

use super::auth::{failure, guard, handlers};
use super::session::Session;
use super::tweets;
use crate::client::OAuthProvider;
use crate::config::Config;
use crate::error::AppResult;

/// Header accepted in place of the `authenticity_token` form field.
const CSRF_HEADER: &str = "x-csrf-token";

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn OAuthProvider>,
    config: Arc<Config>,
    key: Key,
}

impl AppState {
    /// Build handler state around a provider.
    ///
    /// # Errors
    ///
    /// Returns error if the session secret is unusable.
    pub fn new(provider: Arc<dyn OAuthProvider>, config: Config) -> anyhow::Result<Self> {
        let key = config.cookie_key()?;
        Ok(Self { provider, config: Arc::new(config), key })
    }

    /// The remote service.
    #[must_use]
    pub fn provider(&self) -> &dyn OAuthProvider {
        self.provider.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Key signing the session cookie.
    #[must_use]
    pub fn cookie_key(&self) -> &Key {
        &self.key
    }

    /// Persist `session` into the response cookies.
    #[must_use]
    pub fn save_session(&self, session: &Session, jar: SignedCookieJar) -> SignedCookieJar {
        session.save(jar, self.config.secure_cookies())
    }

    /// Public base URL: configured, else taken from the `Host` header.
    #[must_use]
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(ref base_url) = self.config.base_url {
            return base_url.clone();
        }
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{host}")
    }

    /// Check the anti-forgery token of a state-changing request.
    pub fn verify_forgery(
        &self,
        session: &Session,
        headers: &HeaderMap,
        form_token: Option<&str>,
    ) -> AppResult<()> {
        if !self.config.forgery_protection {
            return Ok(());
        }
        let presented = form_token
            .or_else(|| headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()));
        session.verify_authenticity_token(presented)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("config", &self.config).finish()
    }
}

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(tweets::index))
        .route("/tweets", get(tweets::index).post(tweets::create_tweet))
        .route("/tweets/new", get(tweets::new_tweet))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::require_login));

    Router::new()
        .route("/health", get(health_check))
        .route("/sessions/new", get(handlers::new_session).post(handlers::new_session))
        .route("/sessions", post(handlers::create_session).delete(handlers::destroy_session))
        .route("/sessions/write", get(handlers::write_session))
        .route("/sessions/destroy", post(handlers::destroy_session))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), failure::force_login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tweet-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
