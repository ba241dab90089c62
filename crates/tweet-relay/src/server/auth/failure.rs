//! Global failure handler.
//!
//! Handlers return [`AppError`]; its response carries an [`AuthFailure`]
//! marker that [`force_login`] turns into a reset session, a flash message
//! and a redirect to the login page.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::flow::LOGIN_PATH;
use crate::error::AppError;
use crate::server::router::AppState;
use crate::server::session::Session;

/// Response extension marking a request that failed authorization.
#[derive(Debug, Clone)]
pub struct AuthFailure {
    /// Error kind, for logs.
    pub kind: &'static str,
    /// Message queued for the user.
    pub message: &'static str,
    /// Full error text, for logs.
    pub detail: String,
    /// Back-off the remote service asked for, if any.
    pub retry_after: Option<Duration>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::UNAUTHORIZED.into_response();
        response.extensions_mut().insert(AuthFailure {
            kind: self.kind(),
            message: self.to_user_message(),
            detail: self.to_string(),
            retry_after: self.retry_after(),
        });
        response
    }
}

/// Flush the session and start over whenever a handler failed.
pub async fn force_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(failure) = response.extensions().get::<AuthFailure>().cloned() else {
        return response;
    };

    tracing::warn!(
        kind = failure.kind,
        error = %failure.detail,
        retry_after_secs = failure.retry_after.map(|d| d.as_secs()),
        "Request failed, forcing login"
    );

    let session = Session::with_flash(failure.message);
    (state.save_session(&session, jar), Redirect::to(LOGIN_PATH)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CREDENTIALS_EXPIRED, ClientError};

    #[test]
    fn test_app_error_response_is_marked() {
        let response = AppError::from(ClientError::unauthorized("expired token")).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let failure = response.extensions().get::<AuthFailure>().unwrap();
        assert_eq!(failure.kind, "credentials_rejected");
        assert_eq!(failure.message, CREDENTIALS_EXPIRED);
        assert!(failure.detail.contains("expired token"));
        assert!(failure.retry_after.is_none());
    }

    #[test]
    fn test_rate_limited_response_carries_retry_after() {
        let response = AppError::from(ClientError::rate_limited(15)).into_response();
        let failure = response.extensions().get::<AuthFailure>().unwrap();
        assert_eq!(failure.kind, "remote_auth");
        assert_eq!(failure.retry_after, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_forgery_response_is_marked() {
        let response = AppError::ForgeryToken.into_response();
        let failure = response.extensions().get::<AuthFailure>().unwrap();
        assert_eq!(failure.kind, "forgery_token");
    }
}
