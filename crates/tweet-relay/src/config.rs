//! Configuration for the tweet relay.

use std::time::Duration;

use axum_extra::extract::cookie::Key;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Default remote API endpoint.
    pub const DEFAULT_ENDPOINT: &str = "https://api.twitter.com";

    /// Request token endpoint (handshake step 1).
    pub const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";

    /// User authorization page (handshake step 2).
    pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

    /// Access token endpoint (handshake step 3).
    pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

    /// Identity of the authorized user.
    pub const VERIFY_CREDENTIALS_PATH: &str = "/1.1/account/verify_credentials.json";

    /// Status creation.
    pub const UPDATE_STATUS_PATH: &str = "/1.1/statuses/update.json";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Retries for handshake and credential calls. Posting never retries.
    pub const MAX_RETRIES: u32 = 2;
}

/// Session cookie settings.
pub mod session {
    /// Name of the signed session cookie.
    pub const COOKIE_NAME: &str = "_tweet_relay_session";

    /// Minimum length of a configured session secret, in bytes.
    pub const MIN_SECRET_LEN: usize = 64;
}

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// OAuth consumer key.
    pub consumer_key: String,

    /// OAuth consumer secret.
    pub consumer_secret: String,

    /// Base URL of the remote API (overridable for proxies and mock servers).
    pub api_endpoint: String,

    /// Public base URL of this service, used to build the OAuth callback.
    /// Derived from the request `Host` header when unset.
    pub base_url: Option<String>,

    /// Secret used to sign the session cookie.
    pub session_secret: Option<String>,

    /// Whether form posts must carry the session's authenticity token.
    pub forgery_protection: bool,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a new configuration for the given consumer credentials, talking
    /// to the default endpoint.
    #[must_use]
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            api_endpoint: api::DEFAULT_ENDPOINT.to_string(),
            base_url: None,
            session_secret: None,
            forgery_protection: true,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Override the API endpoint. `None` keeps the default.
    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.api_endpoint = normalize_endpoint(endpoint);
        }
        self
    }

    /// Set the public base URL of this service.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    /// Set the session signing secret.
    #[must_use]
    pub fn with_session_secret(mut self, secret: Option<String>) -> Self {
        self.session_secret = secret;
        self
    }

    /// Create a test configuration pointing at a mock server.
    ///
    /// Forgery protection is off, as in a test environment.
    #[must_use]
    pub fn for_testing(api_endpoint: &str) -> Self {
        Self {
            consumer_key: "test-consumer-key".to_string(),
            consumer_secret: "test-consumer-secret".to_string(),
            api_endpoint: normalize_endpoint(api_endpoint),
            base_url: Some("http://relay.test".to_string()),
            session_secret: Some("s".repeat(session::MIN_SECRET_LEN)),
            forgery_protection: false,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the consumer credentials are missing.
    pub fn from_env() -> anyhow::Result<Self> {
        let consumer_key = std::env::var("CONSUMER_KEY")
            .map_err(|_| anyhow::anyhow!("CONSUMER_KEY is not set"))?;
        let consumer_secret = std::env::var("CONSUMER_SECRET")
            .map_err(|_| anyhow::anyhow!("CONSUMER_SECRET is not set"))?;

        Ok(Self::new(consumer_key, consumer_secret)
            .with_api_endpoint(std::env::var("TWITTER_API_ENDPOINT").ok().as_deref())
            .with_base_url(std::env::var("BASE_URL").ok())
            .with_session_secret(std::env::var("SESSION_SECRET").ok()))
    }

    /// Build the key that signs the session cookie.
    ///
    /// Without a configured secret a random key is generated, so sessions do
    /// not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns error if the configured secret is shorter than 64 bytes.
    pub fn cookie_key(&self) -> anyhow::Result<Key> {
        match self.session_secret {
            Some(ref secret) => {
                if secret.len() < session::MIN_SECRET_LEN {
                    anyhow::bail!(
                        "SESSION_SECRET must be at least {} bytes",
                        session::MIN_SECRET_LEN
                    );
                }
                Key::try_from(secret.as_bytes())
                    .map_err(|e| anyhow::anyhow!("invalid SESSION_SECRET: {e}"))
            }
            None => {
                tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }

    /// Whether the session cookie should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.as_deref().is_some_and(|u| u.starts_with("https://"))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("consumer_key", &self.consumer_key)
            .field("api_endpoint", &self.api_endpoint)
            .field("base_url", &self.base_url)
            .field("forgery_protection", &self.forgery_protection)
            .finish()
    }
}

/// Normalize an endpoint override: a bare host gets `http://`, trailing
/// slashes are dropped.
#[must_use]
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_twitter() {
        let config = Config::new("key", "secret");
        assert_eq!(config.api_endpoint, api::DEFAULT_ENDPOINT);
        assert!(config.forgery_protection);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_endpoint_override() {
        let config = Config::new("key", "secret").with_api_endpoint(Some("proxy.example.net/"));
        assert_eq!(config.api_endpoint, "http://proxy.example.net");

        let config = Config::new("key", "secret").with_api_endpoint(Some("  "));
        assert_eq!(config.api_endpoint, api::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_normalize_endpoint_keeps_scheme() {
        assert_eq!(normalize_endpoint("https://api.example.com/"), "https://api.example.com");
        assert_eq!(normalize_endpoint("http://127.0.0.1:9000"), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_cookie_key_rejects_short_secret() {
        let config = Config::new("key", "secret").with_session_secret(Some("too-short".into()));
        assert!(config.cookie_key().is_err());
    }

    #[test]
    fn test_cookie_key_generated_when_unset() {
        assert!(Config::new("key", "secret").cookie_key().is_ok());
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        let config = Config::new("k", "s").with_base_url(Some("https://relay.example/".into()));
        assert!(config.secure_cookies());
        assert_eq!(config.base_url.as_deref(), Some("https://relay.example"));
        assert!(!Config::for_testing("http://127.0.0.1:1").secure_cookies());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = Config::new("key", "super-secret-consumer")
            .with_session_secret(Some("x".repeat(64)));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-consumer"));
        assert!(!debug.contains(&"x".repeat(64)));
    }
}
