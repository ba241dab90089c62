//! Seams between the web layer and the remote service.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{RequestToken, Status, TokenPair, User};

/// The three-legged OAuth handshake against a remote service.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Obtain a request token whose approval will redirect to `callback_url`.
    async fn start_handshake(&self, callback_url: &str) -> ClientResult<RequestToken>;

    /// Exchange an approved request token and its verifier for an access pair.
    async fn complete_handshake(
        &self,
        request_token: &TokenPair,
        verifier: &str,
    ) -> ClientResult<TokenPair>;

    /// Rehydrate an authorized client from a stored access pair.
    fn resume_session(&self, access_token: TokenPair) -> Box<dyn AuthorizedClient>;
}

/// Calls made on behalf of a signed-in user.
#[async_trait]
pub trait AuthorizedClient: Send + Sync {
    /// Identity of the user the access pair belongs to.
    async fn verify_credentials(&self) -> ClientResult<User>;

    /// Post `text` verbatim as a new status.
    async fn update_status(&self, text: &str) -> ClientResult<Status>;
}
