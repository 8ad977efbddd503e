//! Auth route handlers.
//!
//! Account state lives with the hosted identity service; these handlers
//! relay to it and keep the resulting identity in the cookie session.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use neon_pulse_core::{Email, UserId, UserRole};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The session identity as served to the SPA.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}

/// Create an account.
///
/// Does not establish a session: the identity service may require email
/// confirmation before the first login.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response> {
    let service = AuthService::new(state.supabase());
    let profile = service
        .register(&request.email, &request.password, &request.phone_number)
        .await?;

    tracing::info!(user_id = %profile.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": profile.id,
            "email": profile.email,
        })),
    )
        .into_response())
}

/// Login and establish the session.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<IdentityResponse>> {
    let service = AuthService::new(state.supabase());
    let user = service.login(&request.email, &request.password).await?;

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, role = %user.role, "login");

    Ok(Json(IdentityResponse {
        id: user.id,
        email: user.email,
        role: user.role,
    }))
}

/// Logout: drop the identity from the session.
///
/// The cart survives - only the login does not.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Current session identity, or 401 when not logged in.
#[instrument(skip(auth))]
pub async fn me(OptionalAuth(auth): OptionalAuth) -> Result<Json<IdentityResponse>> {
    let user = auth.ok_or_else(|| AppError::Unauthorized("not logged in".to_owned()))?;

    Ok(Json(IdentityResponse {
        id: user.id,
        email: user.email,
        role: user.role,
    }))
}
