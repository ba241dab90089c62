//! Login check for protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::flow::{self, LOGIN_PATH};
use crate::server::router::AppState;
use crate::server::session::Session;

/// Redirect anonymous users to the login page, remembering where they were
/// going when the request was a GET.
pub async fn require_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    let mut session = Session::load(&jar);
    let requested = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());

    if flow::guard(&mut session, request.method(), &requested) {
        return next.run(request).await;
    }

    tracing::debug!(method = %request.method(), path = %requested, "Login required");
    (state.save_session(&session, jar), Redirect::to(LOGIN_PATH)).into_response()
}
