//! Tweet Relay
//!
//! A small web application that signs a user in with Twitter over OAuth 1.0a
//! and posts a status update on their behalf.
//!
//! # Features
//!
//! - **Three-legged OAuth 1.0a**: request token, user approval, access token
//! - **Cookie sessions**: signed, no server-side storage
//! - **One recovery policy**: any authorization failure resets the session and
//!   sends the user back to sign in
//!
//! # Example
//!
//! ```no_run
//! use tweet_relay::{config::Config, server::WebServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     WebServer::new(config)?.run_http(3000).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use client::{AuthorizedClient, OAuthProvider, TwitterOAuth};
pub use config::Config;
pub use error::{AppError, ClientError};
