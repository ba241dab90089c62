//! Sign in with the remote service over OAuth 1.0a.
//!
//! - [`flow`]: handshake transitions on the session
//! - [`handlers`]: `/sessions` endpoints
//! - [`guard`]: login check for protected routes
//! - [`failure`]: the single recovery policy for failed requests

pub mod failure;
pub mod flow;
pub mod guard;
pub mod handlers;

pub use failure::AuthFailure;
pub use flow::{AuthState, CALLBACK_PATH, LOGIN_PATH, ROOT_PATH};
