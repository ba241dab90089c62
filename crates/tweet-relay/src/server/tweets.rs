//! Compose page and the single posting action. All routes are behind the
//! login guard.

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use crate::client::OAuthProvider;
use crate::error::{AppError, AppResult};
use crate::models::Status;
use crate::server::pages;
use crate::server::router::AppState;
use crate::server::session::Session;

/// Compose page.
pub const NEW_TWEET_PATH: &str = "/tweets/new";

/// Posted compose form.
#[derive(Debug, Default, Deserialize)]
pub struct TweetForm {
    #[serde(default)]
    pub tweet: String,
    #[serde(default)]
    pub authenticity_token: Option<String>,
}

/// Forward `text` verbatim using the session's access pair.
pub async fn submit_post(
    provider: &dyn OAuthProvider,
    session: &Session,
    text: &str,
) -> AppResult<Status> {
    let Some(access) = session.access_token.clone() else {
        return Err(AppError::remote_auth("no access token in session"));
    };
    Ok(provider.resume_session(access).update_status(text).await?)
}

/// `GET /`, `GET /tweets`
pub async fn index() -> Redirect {
    Redirect::to(NEW_TWEET_PATH)
}

/// `GET /tweets/new`
pub async fn new_tweet(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let mut session = Session::load(&jar);
    let token = session.authenticity_token();
    let screen_name = session.screen_name.clone().unwrap_or_default();

    let page = pages::render_compose_page(&screen_name, &token);
    (state.save_session(&session, jar), Html(page))
}

/// `POST /tweets`
///
/// Remote failures are not handled here; they reach the failure handler.
/// A body that is not a form is read as an empty one, so the token check
/// still runs.
pub async fn create_tweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: SignedCookieJar,
    form: Result<Form<TweetForm>, FormRejection>,
) -> AppResult<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let session = Session::load(&jar);
    state.verify_forgery(&session, &headers, form.authenticity_token.as_deref())?;

    let status = submit_post(state.provider(), &session, &form.tweet).await?;

    tracing::info!(
        screen_name = ?session.screen_name,
        status_id = %status.id_str,
        "Posted status"
    );
    Ok(Redirect::to(NEW_TWEET_PATH))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::client::AuthorizedClient;
    use crate::error::{ClientError, ClientResult};
    use crate::models::{RequestToken, TokenPair, User};

    #[derive(Default)]
    struct Recorder {
        posted: Arc<Mutex<Vec<(TokenPair, String)>>>,
    }

    struct RecordingClient {
        access: TokenPair,
        posted: Arc<Mutex<Vec<(TokenPair, String)>>>,
    }

    #[async_trait]
    impl OAuthProvider for Recorder {
        async fn start_handshake(&self, _callback_url: &str) -> ClientResult<RequestToken> {
            Err(ClientError::unauthorized("not used"))
        }

        async fn complete_handshake(&self, _: &TokenPair, _: &str) -> ClientResult<TokenPair> {
            Err(ClientError::unauthorized("not used"))
        }

        fn resume_session(&self, access_token: TokenPair) -> Box<dyn AuthorizedClient> {
            Box::new(RecordingClient { access: access_token, posted: Arc::clone(&self.posted) })
        }
    }

    #[async_trait]
    impl AuthorizedClient for RecordingClient {
        async fn verify_credentials(&self) -> ClientResult<User> {
            Err(ClientError::unauthorized("not used"))
        }

        async fn update_status(&self, text: &str) -> ClientResult<Status> {
            if self.access.token == "revoked" {
                return Err(ClientError::unauthorized("Invalid or expired token"));
            }
            self.posted.lock().unwrap().push((self.access.clone(), text.to_string()));
            Ok(Status { id_str: "99".into(), text: text.into() })
        }
    }

    fn signed_in(access: &str) -> Session {
        Session {
            screen_name: Some("alice".into()),
            access_token: Some(TokenPair::new(access, "as1")),
            ..Session::default()
        }
    }

    #[tokio::test]
    async fn test_submit_post_forwards_text_verbatim() {
        let recorder = Recorder::default();
        let text = "  hello <world> & friends  ";

        let status = submit_post(&recorder, &signed_in("at1"), text).await.unwrap();

        assert_eq!(status.text, text);
        let posted = recorder.posted.lock().unwrap();
        assert_eq!(*posted, vec![(TokenPair::new("at1", "as1"), text.to_string())]);
    }

    #[tokio::test]
    async fn test_submit_post_without_access_token() {
        let recorder = Recorder::default();
        let session = Session { screen_name: Some("alice".into()), ..Session::default() };

        let err = submit_post(&recorder, &session, "hello").await.unwrap_err();
        assert!(matches!(err, AppError::RemoteAuth(_)));
        assert!(recorder.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_post_propagates_remote_failure() {
        let recorder = Recorder::default();
        let err = submit_post(&recorder, &signed_in("revoked"), "hello").await.unwrap_err();
        assert!(matches!(err, AppError::RemoteAuth(ClientError::Unauthorized { .. })));
    }
}
