//! Hosted backend client (Supabase: GoTrue auth + PostgREST rows).
//!
//! # Architecture
//!
//! - The backend is source of truth for accounts and orders - NO local
//!   database, direct REST calls with the service-role key
//! - In-memory caching via `moka` for profile lookups (5 minute TTL)
//! - Conditional row filters (`assigned_to_id=is.null` / `=eq.<staff>`)
//!   make assignment and status writes carry their own authorization check
//!
//! # Endpoints used
//!
//! ```text
//! GET   /auth/v1/health
//! POST  /auth/v1/signup
//! POST  /auth/v1/token?grant_type=password
//! GET   /rest/v1/users?id=eq.<id>
//! POST  /rest/v1/users
//! PATCH /rest/v1/users?id=eq.<id>
//! GET   /rest/v1/orders?...
//! POST  /rest/v1/orders
//! PATCH /rest/v1/orders?id=eq.<id>&assigned_to_id=...
//! ```

mod client;
pub mod types;

pub use client::SupabaseClient;

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The auth endpoint rejected the credentials or signup.
    #[error("auth rejected: {0}")]
    AuthRejected(String),

    /// A unique constraint was violated (e.g., duplicate account).
    #[error("conflict: {0}")]
    Conflict(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A stored row failed domain validation.
    #[error("invalid data in backend: {0}")]
    Data(String),
}

/// Extract a human-readable message from a backend error body.
///
/// GoTrue and PostgREST disagree on the field name (`msg`, `message`,
/// `error_description`), so try each before falling back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_owned();
            }
        }
    }

    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_postgrest() {
        let body = r#"{"message":"duplicate key value violates unique constraint"}"#;
        assert_eq!(
            extract_error_message(body),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_extract_error_message_gotrue() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        // error_description is more specific than error, but message keys win in order
        assert_eq!(extract_error_message(body), "Invalid login credentials");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_body() {
        assert_eq!(extract_error_message("upstream exploded"), "upstream exploded");
    }

    #[test]
    fn test_error_display() {
        let err = SupabaseError::Api {
            status: 500,
            message: "boom".to_owned(),
        };
        assert_eq!(err.to_string(), "backend error (500): boom");
    }
}
