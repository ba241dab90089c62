//! OAuth 1.0a credential pairs.

use serde::{Deserialize, Serialize};

/// A `(token, secret)` pair issued by the remote service.
///
/// Request pairs are short-lived and single-use; access pairs are long-lived
/// and only ever kept in the user's session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Public token value.
    pub token: String,

    /// Secret half, used only for signing.
    pub secret: String,
}

impl TokenPair {
    /// Create a new token pair.
    #[must_use]
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { token: token.into(), secret: secret.into() }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").field("token", &self.token).field("secret", &"***").finish()
    }
}

/// A request token together with the page the user must visit to approve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    /// The unauthorized request pair.
    pub pair: TokenPair,

    /// Authorization page for this token.
    pub authorize_url: String,
}

/// Form-encoded body of `POST /oauth/request_token`.
#[derive(Debug, Deserialize)]
pub struct RequestTokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(default)]
    pub oauth_callback_confirmed: Option<String>,
}

impl RequestTokenResponse {
    /// The service must acknowledge our callback, otherwise the verifier
    /// would never reach us.
    #[must_use]
    pub fn callback_confirmed(&self) -> bool {
        self.oauth_callback_confirmed.as_deref() != Some("false")
    }
}

/// Form-encoded body of `POST /oauth/access_token`.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(default)]
    pub screen_name: Option<String>,
}

impl From<AccessTokenResponse> for TokenPair {
    fn from(response: AccessTokenResponse) -> Self {
        Self::new(response.oauth_token, response.oauth_token_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let pair = TokenPair::new("at1", "very-secret");
        let debug = format!("{pair:?}");
        assert!(debug.contains("at1"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_request_token_response_from_form() {
        let body = "oauth_token=rt1&oauth_token_secret=rs1&oauth_callback_confirmed=true";
        let response: RequestTokenResponse = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(response.oauth_token, "rt1");
        assert_eq!(response.oauth_token_secret, "rs1");
        assert!(response.callback_confirmed());
    }

    #[test]
    fn test_unconfirmed_callback() {
        let body = "oauth_token=rt1&oauth_token_secret=rs1&oauth_callback_confirmed=false";
        let response: RequestTokenResponse = serde_urlencoded::from_str(body).unwrap();
        assert!(!response.callback_confirmed());
    }

    #[test]
    fn test_access_token_response_into_pair() {
        let body = "oauth_token=at1&oauth_token_secret=as1&user_id=42&screen_name=alice";
        let response: AccessTokenResponse = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(response.screen_name.as_deref(), Some("alice"));
        assert_eq!(TokenPair::from(response), TokenPair::new("at1", "as1"));
    }
}
