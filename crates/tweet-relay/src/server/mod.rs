//! Web front end.
//!
//! Sign-in, compose and post, on a cookie-backed session. Every request is
//! independent; the only state that travels between requests is the signed
//! session cookie.

pub mod auth;
pub mod pages;
pub mod router;
pub mod session;
pub mod tweets;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::TwitterOAuth;
use crate::config::Config;

pub use router::{AppState, create_router};
pub use session::Session;

/// Tweet relay web server.
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    /// Create a server talking to the configured remote service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client or the session key cannot be built.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let provider = Arc::new(TwitterOAuth::new(&config)?);
        let state = AppState::new(provider, config)?;
        Ok(Self { state })
    }

    /// Router serving this server's routes.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    /// Run the server on `port`.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(
            api_endpoint = %self.state.config().api_endpoint,
            forgery_protection = self.state.config().forgery_protection,
            "Starting tweet relay"
        );

        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for WebServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServer").field("state", &self.state).finish()
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
