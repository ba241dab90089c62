//! Per-user session kept in a signed cookie.
//!
//! Handlers load a [`Session`] from the [`SignedCookieJar`] at the start of a
//! request, mutate it, and hand the updated jar back with their response.
//! The cookie value is base64url-encoded JSON, so URLs stored in
//! `return_to` cannot break cookie syntax.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::config::session::COOKIE_NAME;
use crate::error::{AppError, AppResult};
use crate::models::TokenPair;

/// Session fields. An empty session produces no cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Screen name of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,

    /// Pending request token, only during the handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<TokenPair>,

    /// Access token of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<TokenPair>,

    /// Where to go once signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,

    /// One-shot message for the next page render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,

    /// Anti-forgery token embedded in forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticity_token: Option<String>,
}

impl Session {
    /// A fresh session carrying only a flash message.
    #[must_use]
    pub fn with_flash(message: impl Into<String>) -> Self {
        Self { flash: Some(message.into()), ..Self::default() }
    }

    /// Read the session from the request cookies.
    ///
    /// A missing, tampered or undecodable cookie yields an empty session.
    #[must_use]
    pub fn load(jar: &SignedCookieJar) -> Self {
        let Some(cookie) = jar.get(COOKIE_NAME) else {
            return Self::default();
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(cookie.value())
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()));

        match decoded {
            Ok(session) => session,
            Err(error) => {
                tracing::debug!(%error, "Discarding unreadable session cookie");
                Self::default()
            }
        }
    }

    /// Write the session into the jar, or remove the cookie when empty.
    #[must_use]
    pub fn save(&self, jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
        if self.is_empty() {
            return jar.remove(Cookie::build((COOKIE_NAME, "")).path("/"));
        }

        // Serializing plain strings and options cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        let cookie = Cookie::build((COOKIE_NAME, URL_SAFE_NO_PAD.encode(json)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure);
        jar.add(cookie)
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A screen name is the sole proof of being signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.screen_name.is_some()
    }

    /// Take the queued message, if any.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    /// The session's anti-forgery token, generated on first use.
    pub fn authenticity_token(&mut self) -> String {
        self.authenticity_token.get_or_insert_with(generate_token).clone()
    }

    /// Check a presented anti-forgery token against the session.
    pub fn verify_authenticity_token(&self, presented: Option<&str>) -> AppResult<()> {
        match (self.authenticity_token.as_deref(), presented) {
            (Some(expected), Some(presented)) if expected == presented => Ok(()),
            _ => Err(AppError::ForgeryToken),
        }
    }
}

/// Random token built from two UUIDs (256 bits).
fn generate_token() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::Key;

    use super::*;

    fn key() -> Key {
        Key::from(&[7u8; 64])
    }

    /// Feed the `Set-Cookie` header of a response back in as a request cookie.
    fn round_trip(jar: SignedCookieJar) -> SignedCookieJar {
        let response = (jar, ()).into_response();
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        SignedCookieJar::from_headers(&headers, key())
    }

    #[test]
    fn test_empty_session_from_empty_jar() {
        let jar = SignedCookieJar::new(key());
        assert!(Session::load(&jar).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let session = Session {
            screen_name: Some("alice".into()),
            access_token: Some(TokenPair::new("at1", "as1")),
            return_to: Some("/tweets/new?draft=a;b".into()),
            ..Session::default()
        };

        let jar = session.save(SignedCookieJar::new(key()), false);
        let loaded = Session::load(&jar);
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_unsigned_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{COOKIE_NAME}=eyJzY3JlZW5fbmFtZSI6ImV2ZSJ9")).unwrap(),
        );
        let jar = SignedCookieJar::from_headers(&headers, key());
        assert!(Session::load(&jar).is_empty());
    }

    #[test]
    fn test_saved_cookie_survives_headers() {
        let session = Session::with_flash("hello");
        let jar = session.save(SignedCookieJar::new(key()), false);
        let reloaded = round_trip(jar);
        assert_eq!(Session::load(&reloaded).flash.as_deref(), Some("hello"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session {
            screen_name: Some("alice".into()),
            request_token: Some(TokenPair::new("rt1", "rs1")),
            access_token: Some(TokenPair::new("at1", "as1")),
            return_to: Some("/tweets/new".into()),
            flash: Some("hi".into()),
            authenticity_token: Some("tok".into()),
        };
        session.reset();
        assert!(session.is_empty());
    }

    #[test]
    fn test_flash_is_consumed_once() {
        let mut session = Session::with_flash("Credentials expired");
        assert_eq!(session.take_flash().as_deref(), Some("Credentials expired"));
        assert_eq!(session.take_flash(), None);
    }

    #[test]
    fn test_authenticity_token_is_stable() {
        let mut session = Session::default();
        let first = session.authenticity_token();
        assert_eq!(first.len(), 64);
        assert_eq!(session.authenticity_token(), first);

        assert!(session.verify_authenticity_token(Some(&first)).is_ok());
        assert!(session.verify_authenticity_token(Some("forged")).is_err());
        assert!(session.verify_authenticity_token(None).is_err());
    }

    #[test]
    fn test_missing_session_token_rejects_everything() {
        let session = Session::default();
        assert!(matches!(
            session.verify_authenticity_token(Some("anything")),
            Err(AppError::ForgeryToken)
        ));
    }
}
