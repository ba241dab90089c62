//! `/sessions` endpoints: login page, handshake start and completion, logout.

use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::flow::{self, CALLBACK_PATH, LOGIN_PATH};
use crate::error::{AppError, AppResult};
use crate::server::pages;
use crate::server::router::AppState;
use crate::server::session::Session;

/// Form carrying only the anti-forgery token.
#[derive(Debug, Default, Deserialize)]
pub struct AuthenticityForm {
    #[serde(default)]
    pub authenticity_token: Option<String>,
}

/// Query string of the OAuth callback.
#[derive(Debug, Default, Deserialize)]
pub struct WriteQuery {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    /// Set instead of a verifier when the user declined.
    pub denied: Option<String>,
    pub return_to: Option<String>,
}

/// `GET|POST /sessions/new`
///
/// Render the login page, showing (and consuming) any queued message.
pub async fn new_session(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let mut session = Session::load(&jar);
    let flash = session.take_flash();
    let token = session.authenticity_token();

    let page = pages::render_login_page(flash.as_deref(), &token);
    (state.save_session(&session, jar), Html(page))
}

/// `POST /sessions`
///
/// Ask the remote service for a request token and send the user off to
/// approve it.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: SignedCookieJar,
    form: Result<Form<AuthenticityForm>, FormRejection>,
) -> AppResult<impl IntoResponse> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let mut session = Session::load(&jar);
    state.verify_forgery(&session, &headers, form.authenticity_token.as_deref())?;

    let callback_url = format!("{}{}", state.base_url(&headers), CALLBACK_PATH);
    let target = flow::begin(state.provider(), &mut session, &callback_url).await?;

    tracing::info!(callback = %callback_url, "Started OAuth handshake");
    Ok((state.save_session(&session, jar), Redirect::to(&target)))
}

/// `GET /sessions/write`
///
/// The remote service redirects here once the user approved (or declined).
pub async fn write_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<WriteQuery>,
) -> AppResult<impl IntoResponse> {
    if query.denied.is_some() {
        return Err(AppError::remote_auth("authorization denied by user"));
    }

    let mut session = Session::load(&jar);
    let target = flow::complete(
        state.provider(),
        &mut session,
        query.oauth_token.as_deref(),
        query.oauth_verifier.as_deref(),
        query.return_to.as_deref(),
    )
    .await?;

    tracing::info!(screen_name = ?session.screen_name, "Signed in");
    Ok((state.save_session(&session, jar), Redirect::to(&target)))
}

/// `DELETE /sessions`, `POST /sessions/destroy`
pub async fn destroy_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let mut session = Session::load(&jar);
    let screen_name = session.screen_name.clone();
    flow::sign_out(&mut session);

    tracing::info!(screen_name = ?screen_name, "Signed out");
    (state.save_session(&session, jar), Redirect::to(LOGIN_PATH))
}
