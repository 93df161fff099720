//! HTTP client for the hosted identity provider.
//!
//! Authentication is delegated entirely to the provider: this client signs
//! users in and out and relays the sessions the provider issues, but never
//! hashes a credential or validates a token itself. Provider refusals
//! (wrong password, duplicate signup) are error *values*; connect/decode
//! problems are transport *faults*, mirroring the store client's split.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::models::session::{AuthUser, Session};

/// Identity provider failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider evaluated the request and refused it.
    #[error("{message}")]
    Rejected { message: String },

    /// Transport-level fault reaching the provider.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider's response did not match the expected shape.
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Rejected { message } => AppError::AuthRejected(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// Profile fields collected by the signup form.
#[derive(Debug, Clone, Serialize)]
pub struct SignupProfile {
    pub first_name: String,
    pub last_name: String,
}

/// What the provider issued for a signup.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// The project auto-confirms: a full session came back.
    SignedIn(Session),
    /// Email confirmation pending: only the bare user came back.
    ConfirmationRequired(AuthUser),
}

/// Error body shapes the provider uses across endpoints.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl AuthErrorBody {
    fn message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupBody {
    Session(Session),
    User(AuthUser),
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Exchange email + password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response
            .json::<Session>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Register a new account with profile fields.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignupProfile,
    ) -> Result<SignupOutcome, AuthError> {
        let url = format!("{}/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": profile,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        match response.json::<SignupBody>().await {
            Ok(SignupBody::Session(session)) => Ok(SignupOutcome::SignedIn(session)),
            Ok(SignupBody::User(user)) => Ok(SignupOutcome::ConfirmationRequired(user)),
            Err(e) => Err(AuthError::Decode(e.to_string())),
        }
    }

    /// Revoke a session at the provider.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/logout", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    /// Entry URL for an OAuth sign-in; the browser completes the flow with
    /// the provider directly.
    pub fn authorize_url(&self, provider: &str) -> String {
        format!("{}/authorize?provider={provider}", self.base_url)
    }

    /// Reachability check for the readiness probe.
    pub async fn ping(&self) -> Result<(), AuthError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    async fn rejection(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let message = match response.json::<AuthErrorBody>().await {
            Ok(body) => body
                .message()
                .unwrap_or_else(|| format!("HTTP {status}")),
            Err(_) => format!("HTTP {status}"),
        };
        AuthError::Rejected { message }
    }
}
