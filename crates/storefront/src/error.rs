//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding. All route handlers return `Result<T, AppError>`; the
//! response body is always JSON `{"error": "..."}` with a mapped status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::stripe::PaymentsError;
use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Hosted backend operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] SupabaseError),

    /// Payment API operation failed.
    #[error("Payments error: {0}")]
    Payments(#[from] PaymentsError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order workflow operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Payments(PaymentsError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Self::Payments(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::MissingPhone => StatusCode::BAD_REQUEST,
                AuthError::Backend(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Order(err) => match err {
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::EmptyCart | OrderError::MissingFields(_) => StatusCode::BAD_REQUEST,
                OrderError::AlreadyAssigned { .. } => StatusCode::CONFLICT,
                OrderError::NotAssignee => StatusCode::FORBIDDEN,
                OrderError::Backend(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// User-facing message. Upstream failures collapse to a generic line so
    /// internals never leak into a response body.
    fn message(&self) -> String {
        match self {
            Self::Backend(_) | Self::Auth(AuthError::Backend(_)) => {
                "External service error".to_string()
            }
            Self::Order(OrderError::Backend(_)) => "External service error".to_string(),
            Self::Payments(_) => "Failed to create payment intent".to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::NotFound(msg) => format!("Not found: {msg}"),
            Self::Unauthorized(_) => "Authentication required".to_string(),
            Self::Forbidden(msg) => msg.clone(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server-side faults to Sentry; client errors are noise
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("order".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("login".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("staff only".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_order_error_statuses() {
        assert_eq!(
            get_status(AppError::Order(OrderError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::AlreadyAssigned {
                assignee: "a@b.c".to_string()
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::NotAssignee)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_upstream_errors_do_not_leak_details() {
        let err = AppError::Backend(SupabaseError::Api {
            status: 500,
            message: "secret internal detail".to_string(),
        });
        assert_eq!(err.message(), "External service error");

        let err = AppError::Payments(PaymentsError::Api {
            status: 401,
            message: "bad api key sk_live_...".to_string(),
        });
        assert_eq!(err.message(), "Failed to create payment intent");
    }

    #[test]
    fn test_assignment_conflict_names_holder() {
        let err = AppError::Order(OrderError::AlreadyAssigned {
            assignee: "staff@neonpulse.shop".to_string(),
        });
        assert!(err.message().contains("staff@neonpulse.shop"));
    }
}
