//! Sessions issued by the hosted identity provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identity-provider user embedded in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    /// Profile fields supplied at signup (first/last name); shape is owned
    /// by the provider.
    #[serde(default)]
    pub user_metadata: Value,
}

/// Session as issued by the identity provider. The tokens are opaque to this
/// application; validation and refresh are the provider's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Session view returned to the browser page — tokens stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub expires_in: Option<i64>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user.id,
            email: session.user.email.clone(),
            expires_in: session.expires_in,
        }
    }
}
