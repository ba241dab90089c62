//! Twitter API client.
//!
//! Provides the OAuth 1.0a handshake and the two authorized calls the relay
//! needs, with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for handshake and identity calls
//! - A non-retrying path for posting, so a status is never sent twice

pub mod provider;
pub mod signer;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

pub use provider::{AuthorizedClient, OAuthProvider};
pub use signer::Signer;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AccessTokenResponse, RequestToken, RequestTokenResponse, Status, TokenPair, User,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// OAuth consumer for the remote service.
#[derive(Clone)]
pub struct TwitterOAuth {
    /// HTTP client with retry middleware.
    client: ClientWithMiddleware,

    /// HTTP client without retry, for non-idempotent calls.
    single_shot: ClientWithMiddleware,

    /// Consumer key.
    consumer_key: String,

    /// Consumer secret.
    consumer_secret: String,

    /// API base URL.
    api_endpoint: String,
}

impl TwitterOAuth {
    /// Create a new consumer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tweet-relay/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(200), Duration::from_secs(5))
            .build_with_max_retries(api::MAX_RETRIES);

        let single_shot = ClientBuilder::new(client.clone()).build();
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            single_shot,
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            api_endpoint: config.api_endpoint.clone(),
        })
    }

    /// Authorization page for a request token.
    #[must_use]
    pub fn authorize_url(&self, request_token: &str) -> String {
        format!(
            "{}{}?oauth_token={}",
            self.api_endpoint,
            api::AUTHORIZE_PATH,
            signer::percent_encode(request_token)
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_endpoint, path)
    }

    fn signer(&self) -> Signer<'_> {
        Signer::new(&self.consumer_key, &self.consumer_secret)
    }

    /// Signed POST to a token endpoint; the body is form-encoded credentials.
    async fn token_request<T>(
        &self,
        path: &str,
        token: Option<&TokenPair>,
        protocol: &[(&str, &str)],
    ) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        let signer = match token {
            Some(token) => self.signer().with_token(token),
            None => self.signer(),
        };
        let header = signer.authorization_header("POST", &url, &[], protocol);

        let response = self.client.post(&url).header(AUTHORIZATION, header).send().await?;
        let body = handle_response(response).await?.text().await?;

        Ok(serde_urlencoded::from_str(&body)?)
    }
}

#[async_trait]
impl OAuthProvider for TwitterOAuth {
    async fn start_handshake(&self, callback_url: &str) -> ClientResult<RequestToken> {
        let response: RequestTokenResponse = self
            .token_request(api::REQUEST_TOKEN_PATH, None, &[("oauth_callback", callback_url)])
            .await?;

        if !response.callback_confirmed() {
            return Err(ClientError::unauthorized("callback URL was not confirmed"));
        }

        let authorize_url = self.authorize_url(&response.oauth_token);
        Ok(RequestToken {
            pair: TokenPair::new(response.oauth_token, response.oauth_token_secret),
            authorize_url,
        })
    }

    async fn complete_handshake(
        &self,
        request_token: &TokenPair,
        verifier: &str,
    ) -> ClientResult<TokenPair> {
        let response: AccessTokenResponse = self
            .token_request(
                api::ACCESS_TOKEN_PATH,
                Some(request_token),
                &[("oauth_verifier", verifier)],
            )
            .await?;

        tracing::debug!(screen_name = ?response.screen_name, "Exchanged request token");

        Ok(response.into())
    }

    fn resume_session(&self, access_token: TokenPair) -> Box<dyn AuthorizedClient> {
        Box::new(TwitterClient { oauth: self.clone(), access_token })
    }
}

impl std::fmt::Debug for TwitterOAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterOAuth")
            .field("consumer_key", &self.consumer_key)
            .field("api_endpoint", &self.api_endpoint)
            .finish()
    }
}

/// Client authorized with a user's access pair.
#[derive(Clone)]
pub struct TwitterClient {
    oauth: TwitterOAuth,
    access_token: TokenPair,
}

impl TwitterClient {
    fn signer(&self) -> Signer<'_> {
        self.oauth.signer().with_token(&self.access_token)
    }
}

#[async_trait]
impl AuthorizedClient for TwitterClient {
    async fn verify_credentials(&self) -> ClientResult<User> {
        let url = self.oauth.url(api::VERIFY_CREDENTIALS_PATH);
        let header = self.signer().authorization_header("GET", &url, &[], &[]);

        let response = self.oauth.client.get(&url).header(AUTHORIZATION, header).send().await?;
        let value: serde_json::Value = handle_response(response).await?.json().await?;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    async fn update_status(&self, text: &str) -> ClientResult<Status> {
        let url = self.oauth.url(api::UPDATE_STATUS_PATH);
        let params = [("status", text)];
        let header = self.signer().authorization_header("POST", &url, &params, &[]);
        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .oauth
            .single_shot
            .post(&url)
            .header(AUTHORIZATION, header)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let value: serde_json::Value = handle_response(response).await?.json().await?;

        serde_json::from_value(value).map_err(ClientError::from)
    }
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient").field("access_token", &self.access_token).finish()
    }
}

/// Handle API response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::unauthorized(text))
        }
        403 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::forbidden(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_uses_endpoint() {
        let oauth = TwitterOAuth::new(&Config::for_testing("https://api.example.com")).unwrap();
        assert_eq!(
            oauth.authorize_url("rt 1"),
            "https://api.example.com/oauth/authorize?oauth_token=rt%201"
        );
    }

    #[test]
    fn test_debug_hides_consumer_secret() {
        let oauth = TwitterOAuth::new(&Config::for_testing("https://api.example.com")).unwrap();
        let debug = format!("{oauth:?}");
        assert!(!debug.contains("test-consumer-secret"));
        assert!(debug.contains("api.example.com"));
    }
}
