//! Authentication service.
//!
//! Fronts the hosted identity service: accounts, passwords, and sessions
//! live there; this service validates input, relays the calls, and shapes
//! the result into the session identity. Email confirmation is the identity
//! service's job and happens out of band.

use chrono::Utc;
use thiserror::Error;

use neon_pulse_core::{Email, EmailError, UserRole};

use crate::models::session::CurrentUser;
use crate::supabase::types::{NewUserProfile, UserProfile};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// No phone number was provided.
    #[error("phone number is required")]
    MissingPhone,

    /// An account with this email already exists.
    #[error("account already exists")]
    EmailTaken,

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The hosted backend failed.
    #[error("backend error: {0}")]
    Backend(SupabaseError),
}

impl From<SupabaseError> for AuthError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Conflict(_) => Self::EmailTaken,
            other => Self::Backend(other),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    supabase: &'a SupabaseClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(supabase: &'a SupabaseClient) -> Self {
        Self { supabase }
    }

    /// Register a new customer account.
    ///
    /// Creates the identity first, then the profile row next to it. New
    /// accounts are always customers; staff accounts are provisioned by
    /// hand in the backend.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword`, or
    /// `AuthError::MissingPhone` for bad input, `AuthError::EmailTaken` for
    /// a duplicate, and `AuthError::Backend` when the backend fails.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(AuthError::MissingPhone);
        }

        let user = self
            .supabase
            .sign_up(email.as_str(), password, phone_number)
            .await
            .map_err(|e| match e {
                SupabaseError::AuthRejected(message)
                    if message.to_lowercase().contains("already") =>
                {
                    AuthError::EmailTaken
                }
                other => other.into(),
            })?;

        let now = Utc::now();
        let profile = self
            .supabase
            .create_profile(&NewUserProfile {
                id: user.id,
                email: email.into_inner(),
                phone_number: phone_number.to_owned(),
                role: UserRole::User,
                created_at: now,
                last_login: now,
            })
            .await?;

        Ok(profile)
    }

    /// Login with email and password.
    ///
    /// Exchanges credentials for a session with the identity service, then
    /// resolves the role from the profile row. A missing profile falls back
    /// to the customer role rather than locking the account out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong, `AuthError::Backend` when the backend fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;

        let session = self
            .supabase
            .sign_in(email.as_str(), password)
            .await
            .map_err(|e| match e {
                SupabaseError::AuthRejected(_) => AuthError::InvalidCredentials,
                other => other.into(),
            })?;

        let role = self
            .supabase
            .get_profile(session.user.id)
            .await?
            .map_or(UserRole::User, |profile| profile.role);

        // Last-login stamp is best effort; a failure shouldn't fail the login
        if let Err(e) = self.supabase.touch_last_login(session.user.id).await {
            tracing::warn!("failed to stamp last_login: {e}");
        }

        Ok(CurrentUser {
            id: session.user.id,
            email,
            role,
        })
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_conflict_maps_to_email_taken() {
        let err: AuthError = SupabaseError::Conflict("duplicate".to_owned()).into();
        assert!(matches!(err, AuthError::EmailTaken));
    }
}
