//! Remote API entities.

use serde::{Deserialize, Serialize};

/// The authenticated account, as returned by `verify_credentials`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID as a string.
    #[serde(default)]
    pub id_str: String,

    /// Handle without the leading `@`.
    pub screen_name: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A created status update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// Status ID as a string.
    #[serde(default)]
    pub id_str: String,

    /// Text as stored by the service.
    #[serde(default)]
    pub text: String,
}
