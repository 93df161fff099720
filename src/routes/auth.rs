//! Authentication routes: signup, login, logout, current session, OAuth.
//!
//! Every credential operation is relayed to the hosted identity provider;
//! these handlers only keep the process-wide session cache in step with
//! what the provider issued.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::identity::{SignupOutcome, SignupProfile};
use crate::models::session::SessionView;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionView>,
}

#[derive(Debug, Serialize)]
pub struct OAuthRedirect {
    pub url: String,
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<ApiResponse<SignupResponse>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = SignupProfile {
        first_name: body.first_name,
        last_name: body.last_name,
    };
    let outcome = state
        .identity
        .sign_up(&body.email, &body.password, &profile)
        .await?;

    let response = match outcome {
        SignupOutcome::SignedIn(session) => {
            let view = SessionView::from(&session);
            state.sessions.replace(Some(session));
            tracing::info!(user_id = %view.user_id, "account created and signed in");
            SignupResponse {
                message: "Account created!".to_string(),
                session: Some(view),
            }
        }
        SignupOutcome::ConfirmationRequired(user) => {
            tracing::info!(user_id = %user.id, "account created, confirmation pending");
            SignupResponse {
                message: "Account created! Please check your email to verify your account."
                    .to_string(),
                session: None,
            }
        }
    };
    Ok(ApiResponse::success(response))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = state
        .identity
        .sign_in_with_password(&body.email, &body.password)
        .await?;

    let view = SessionView::from(&session);
    state.sessions.replace(Some(session));
    tracing::info!(user_id = %view.user_id, "user signed in");
    Ok(ApiResponse::success(view))
}

/// POST /api/v1/auth/logout — local sign-out proceeds even if the provider
/// call fails.
pub async fn logout(State(state): State<AppState>) -> Json<ApiResponse<&'static str>> {
    if let Some(session) = state.sessions.current() {
        if let Err(error) = state.identity.sign_out(&session.access_token).await {
            tracing::warn!(error = %error, "provider sign-out failed");
        }
    }
    state.sessions.replace(None);
    ApiResponse::success("Logged out successfully")
}

/// GET /api/v1/auth/session — current session, if any.
pub async fn session(State(state): State<AppState>) -> Json<ApiResponse<Option<SessionView>>> {
    ApiResponse::success(state.sessions.current().as_ref().map(SessionView::from))
}

/// GET /api/v1/auth/oauth/{provider} — entry URL for an OAuth sign-in; the
/// browser completes the flow with the provider directly.
pub async fn oauth(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<ApiResponse<OAuthRedirect>>, AppError> {
    if provider.is_empty()
        || !provider
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation("invalid OAuth provider name".to_string()));
    }
    Ok(ApiResponse::success(OAuthRedirect {
        url: state.identity.authorize_url(&provider),
    }))
}
