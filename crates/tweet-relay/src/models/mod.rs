//! Data models for the OAuth handshake and the remote API entities.
//!
//! Token responses are form-encoded; API entities are JSON and use
//! `#[serde(default)]` for optional fields.

mod token;
mod user;

pub use token::{AccessTokenResponse, RequestToken, RequestTokenResponse, TokenPair};
pub use user::{Status, User};
