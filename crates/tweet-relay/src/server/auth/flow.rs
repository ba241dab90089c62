//! Three-legged OAuth handshake as transitions on a [`Session`].
//!
//! ```text
//! Anonymous --begin--> AwaitingAuthorization --complete--> Authenticated
//!     ^                                                         |
//!     +------------------------ sign_out -----------------------+
//! ```
//!
//! Functions here never touch HTTP; handlers translate their return values
//! into redirects.

use axum::http::Method;

use crate::client::OAuthProvider;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::server::session::Session;

/// Login page.
pub const LOGIN_PATH: &str = "/sessions/new";
/// Where the remote service sends the user back with a verifier.
pub const CALLBACK_PATH: &str = "/sessions/write";
/// Default landing page after sign-in.
pub const ROOT_PATH: &str = "/";

/// Where a session stands in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    AwaitingAuthorization,
    Authenticated,
}

impl AuthState {
    #[must_use]
    pub const fn of(session: &Session) -> Self {
        if session.is_authenticated() {
            Self::Authenticated
        } else if session.request_token.is_some() {
            Self::AwaitingAuthorization
        } else {
            Self::Anonymous
        }
    }
}

/// Start the handshake: store the request pair and return the page the user
/// must be sent to.
pub async fn begin(
    provider: &dyn OAuthProvider,
    session: &mut Session,
    callback_url: &str,
) -> AppResult<String> {
    let request = provider.start_handshake(callback_url).await?;
    session.request_token = Some(request.pair);
    Ok(normalize_authorize_url(&request.authorize_url))
}

/// Finish the handshake with the verifier the remote service sent back.
///
/// On success the request pair is replaced by the access pair, the screen
/// name is stored and the redirect target is returned.
pub async fn complete(
    provider: &dyn OAuthProvider,
    session: &mut Session,
    oauth_token: Option<&str>,
    verifier: Option<&str>,
    return_to: Option<&str>,
) -> AppResult<String> {
    let Some(request) = session.request_token.clone() else {
        return Err(AppError::remote_auth("no pending request token"));
    };
    if oauth_token.is_some_and(|t| t != request.token) {
        return Err(AppError::remote_auth("request token mismatch"));
    }
    let Some(verifier) = verifier.filter(|v| !v.is_empty()) else {
        return Err(AppError::remote_auth("missing oauth_verifier"));
    };

    let access = provider.complete_handshake(&request, verifier).await?;
    let user = provider.resume_session(access.clone()).verify_credentials().await?;

    session.request_token = None;
    session.access_token = Some(access);
    sign_in(session, &user);

    Ok(redirect_back_or(session, return_to, ROOT_PATH))
}

/// Forget everything about the user.
pub fn sign_out(session: &mut Session) {
    session.reset();
}

/// Login guard. Returns `true` when the request may proceed; otherwise the
/// requested location is remembered (GET and HEAD only) and the caller must
/// redirect to [`LOGIN_PATH`].
pub fn guard(session: &mut Session, method: &Method, requested: &str) -> bool {
    if AuthState::of(session) == AuthState::Authenticated {
        return true;
    }
    if matches!(*method, Method::GET | Method::HEAD) {
        session.return_to = Some(requested.to_string());
    }
    false
}

fn sign_in(session: &mut Session, user: &User) {
    session.screen_name = Some(user.screen_name.clone());
}

/// Consume the stored return target (falling back to `param`), or `default`.
fn redirect_back_or(session: &mut Session, param: Option<&str>, default: &str) -> String {
    session
        .return_to
        .take()
        .or_else(|| param.map(str::to_string))
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| default.to_string())
}

/// Only same-origin paths are followed after sign-in.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

/// Some clients hand out authorization URLs without a scheme.
#[must_use]
pub fn normalize_authorize_url(url: &str) -> String {
    if url.starts_with("http") { url.to_string() } else { format!("https://{url}") }
}
