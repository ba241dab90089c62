//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Implements the signature base string, signing key and `Authorization`
//! header construction of RFC 5849 §3.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;

use crate::models::TokenPair;

type HmacSha1 = Hmac<Sha1>;

/// Everything except the RFC 3986 unreserved characters.
const OAUTH_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Percent-encode a string the way OAuth 1.0a requires.
#[must_use]
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Build the signature base string for a request.
///
/// Any query string on `url` is dropped; query and form parameters go in
/// `params` together with the `oauth_*` protocol parameters.
#[must_use]
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (percent_encode(k), percent_encode(v))).collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&base_string_uri(url)),
        percent_encode(&normalized)
    )
}

/// Scheme and host lowercased, default port omitted, no query or fragment.
fn base_string_uri(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}

/// Sign a base string with the consumer secret and (optional) token secret.
#[must_use]
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: Option<&str>) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Signs requests on behalf of a consumer, optionally bound to a token.
#[derive(Clone, Copy)]
pub struct Signer<'a> {
    consumer_key: &'a str,
    consumer_secret: &'a str,
    token: Option<&'a TokenPair>,
}

impl<'a> Signer<'a> {
    /// Create a signer for the consumer only (request-token step).
    #[must_use]
    pub const fn new(consumer_key: &'a str, consumer_secret: &'a str) -> Self {
        Self { consumer_key, consumer_secret, token: None }
    }

    /// Bind a request or access token.
    #[must_use]
    pub const fn with_token(mut self, token: &'a TokenPair) -> Self {
        self.token = Some(token);
        self
    }

    /// Build an `Authorization` header with a fresh nonce and timestamp.
    ///
    /// `params` are the request's query or form parameters; `protocol` are
    /// extra `oauth_*` parameters such as `oauth_callback` or `oauth_verifier`.
    #[must_use]
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        protocol: &[(&str, &str)],
    ) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, protocol, &nonce, &timestamp)
    }

    /// Build an `Authorization` header with a given nonce and timestamp.
    #[must_use]
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        protocol: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.into()),
            ("oauth_nonce".into(), nonce.into()),
            ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
            ("oauth_timestamp".into(), timestamp.into()),
            ("oauth_version".into(), OAUTH_VERSION.into()),
        ];
        if let Some(token) = self.token {
            oauth.push(("oauth_token".into(), token.token.clone()));
        }
        oauth.extend(protocol.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

        let mut all = oauth.clone();
        all.extend(params.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

        let base = signature_base_string(method, url, &all);
        let signature =
            sign(&base, self.consumer_secret, self.token.map(|t| t.secret.as_str()));
        oauth.push(("oauth_signature".into(), signature));
        oauth.sort();

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {fields}")
    }
}

impl std::fmt::Debug for Signer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("consumer_key", &self.consumer_key)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
