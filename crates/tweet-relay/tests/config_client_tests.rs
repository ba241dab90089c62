//! Configuration and client tests.
//!
//! Tests actual behavior, not constants.

use tweet_relay::client::TwitterOAuth;
use tweet_relay::config::{Config, api};
use tweet_relay::server::WebServer;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_new_uses_default_endpoint() {
    let config = Config::new("key", "secret");
    assert_eq!(config.api_endpoint, "https://api.twitter.com");
    assert_eq!(config.api_endpoint, api::DEFAULT_ENDPOINT);
}

#[test]
fn test_config_bare_host_override_gets_http() {
    let config = Config::new("key", "secret").with_api_endpoint(Some("localhost:8080"));
    assert_eq!(config.api_endpoint, "http://localhost:8080");
}

#[test]
fn test_config_none_override_keeps_default() {
    let config = Config::new("key", "secret").with_api_endpoint(None);
    assert_eq!(config.api_endpoint, api::DEFAULT_ENDPOINT);
}

#[test]
fn test_config_debug_hides_secrets() {
    let config = Config::new("key", "consumer-secret-value")
        .with_session_secret(Some("x".repeat(64)));
    let debug = format!("{config:?}");
    assert!(!debug.contains("consumer-secret-value"));
    assert!(!debug.contains(&"x".repeat(64)));
}

#[test]
fn test_config_for_testing_disables_forgery_protection() {
    let config = Config::for_testing("http://127.0.0.1:9");
    assert!(!config.forgery_protection);
    assert!(config.cookie_key().is_ok());
}

#[test]
fn test_config_secret_exactly_minimum_length() {
    let config = Config::new("k", "s").with_session_secret(Some("a".repeat(64)));
    assert!(config.cookie_key().is_ok());

    let config = Config::new("k", "s").with_session_secret(Some("a".repeat(63)));
    assert!(config.cookie_key().is_err());
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_creation_succeeds() {
    let client = TwitterOAuth::new(&Config::new("key", "secret"));
    assert!(client.is_ok());
}

#[test]
fn test_client_reports_endpoint() {
    let config = Config::new("key", "secret").with_api_endpoint(Some("https://proxy.example/"));
    let client = TwitterOAuth::new(&config).unwrap();
    assert_eq!(
        client.authorize_url("rt1"),
        "https://proxy.example/oauth/authorize?oauth_token=rt1"
    );
}

#[test]
fn test_client_debug_hides_consumer_secret() {
    let client = TwitterOAuth::new(&Config::new("key", "super-secret-key")).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("consumer_key"));
}

#[test]
fn test_authorize_url_encodes_token() {
    let client = TwitterOAuth::new(&Config::new("key", "secret")).unwrap();
    assert_eq!(
        client.authorize_url("a+b/c"),
        "https://api.twitter.com/oauth/authorize?oauth_token=a%2Bb%2Fc"
    );
}

// =============================================================================
// Server construction
// =============================================================================

#[test]
fn test_server_rejects_short_session_secret() {
    let config = Config::new("k", "s").with_session_secret(Some("short".into()));
    assert!(WebServer::new(config).is_err());
}

#[test]
fn test_server_builds_router() {
    let server = WebServer::new(Config::for_testing("http://127.0.0.1:9")).unwrap();
    let _router = server.router();
}
