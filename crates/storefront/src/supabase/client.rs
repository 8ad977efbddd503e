//! Hosted backend REST client implementation.
//!
//! One `reqwest` client shared behind an `Arc`; every request carries the
//! service-role key. Profile reads are cached with `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use neon_pulse_core::{AssignedStaff, OrderId, OrderStatus, UserId};

use crate::config::SupabaseConfig;

use super::types::{
    AuthSession, AuthUser, NewOrderRecord, NewUserProfile, OrderRecord, SignUpResponse,
    UserProfile,
};
use super::{SupabaseError, extract_error_message};

/// Profile cache TTL. Roles change rarely; five minutes bounds staleness.
const PROFILE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the hosted identity/database backend.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    profiles: Cache<UserId, UserProfile>,
}

impl SupabaseClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let profiles = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(PROFILE_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(SupabaseClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.trim_end_matches('/').to_owned(),
                service_key: config.service_key.expose_secret().to_owned(),
                profiles,
            }),
        }
    }

    /// Build a request with the service-role headers applied.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` if the health endpoint is unreachable or
    /// reports a failure.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        let response = self.request(Method::GET, "/auth/v1/health").send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(SupabaseError::Api {
                status: status.as_u16(),
                message: "health check failed".to_owned(),
            })
        }
    }

    // =========================================================================
    // Auth (GoTrue)
    // =========================================================================

    /// Create an account with the identity service.
    ///
    /// The phone number and role ride along as user metadata, mirroring the
    /// profile row created next to the account.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::AuthRejected`] when the identity service
    /// refuses the signup (duplicate email, weak password policy).
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<AuthUser, SupabaseError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": {
                "phone_number": phone_number,
                "role": "user",
            },
        });

        let response = self
            .request(Method::POST, "/auth/v1/signup")
            .json(&body)
            .send()
            .await?;

        let signup: SignUpResponse = read_auth_json(response).await?;
        Ok(signup.into_user())
    }

    /// Exchange email/password for a session.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::AuthRejected`] on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&body)
            .send()
            .await?;

        read_auth_json(response).await
    }

    // =========================================================================
    // users table
    // =========================================================================

    /// Create the profile row next to a fresh account.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Conflict`] if a profile already exists.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn create_profile(
        &self,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, SupabaseError> {
        let response = self
            .request(Method::POST, "/rest/v1/users")
            .header("Prefer", "return=representation")
            .json(profile)
            .send()
            .await?;

        let mut rows: Vec<UserProfile> = read_json(response).await?;
        let created = rows.pop().ok_or_else(|| {
            SupabaseError::Data("profile insert returned no row".to_owned())
        })?;

        self.inner.profiles.insert(created.id, created.clone()).await;
        Ok(created)
    }

    /// Fetch a profile by account ID. Cached.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, SupabaseError> {
        if let Some(profile) = self.inner.profiles.get(&id).await {
            return Ok(Some(profile));
        }

        let response = self
            .request(Method::GET, "/rest/v1/users")
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())])
            .send()
            .await?;

        let mut rows: Vec<UserProfile> = read_json(response).await?;
        let profile = rows.pop();

        if let Some(profile) = &profile {
            self.inner.profiles.insert(id, profile.clone()).await;
        }

        Ok(profile)
    }

    /// Stamp `last_login` on a profile.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn touch_last_login(&self, id: UserId) -> Result<(), SupabaseError> {
        let body = serde_json::json!({ "last_login": Utc::now() });

        let response = self
            .request(Method::PATCH, "/rest/v1/users")
            .query(&[("id", format!("eq.{id}"))])
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        self.inner.profiles.invalidate(&id).await;
        Ok(())
    }

    // =========================================================================
    // orders table
    // =========================================================================

    /// Insert a new order and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    pub async fn insert_order(
        &self,
        order: &NewOrderRecord,
    ) -> Result<OrderRecord, SupabaseError> {
        let response = self
            .request(Method::POST, "/rest/v1/orders")
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        let mut rows: Vec<OrderRecord> = read_json(response).await?;
        rows.pop()
            .ok_or_else(|| SupabaseError::Data("order insert returned no row".to_owned()))
    }

    /// Fetch one order by ID.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn order_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>, SupabaseError> {
        let response = self
            .request(Method::GET, "/rest/v1/orders")
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())])
            .send()
            .await?;

        let mut rows: Vec<OrderRecord> = read_json(response).await?;
        Ok(rows.pop())
    }

    /// All orders for one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn orders_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderRecord>, SupabaseError> {
        let response = self
            .request(Method::GET, "/rest/v1/orders")
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_owned()),
                ("order", "created_at.desc".to_owned()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    /// Every order, newest first (staff board).
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<OrderRecord>, SupabaseError> {
        let response = self
            .request(Method::GET, "/rest/v1/orders")
            .query(&[
                ("select", "*".to_owned()),
                ("order", "created_at.desc".to_owned()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    /// Claim an order for a staff member.
    ///
    /// The update filters on `assigned_to_id=is.null`, so the write only
    /// lands if the order is still unassigned; `None` means somebody else
    /// holds it (or the order does not exist).
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self, staff), fields(staff_id = %staff.staff_id))]
    pub async fn claim_order(
        &self,
        id: OrderId,
        staff: &AssignedStaff,
    ) -> Result<Option<OrderRecord>, SupabaseError> {
        let body = serde_json::json!({
            "assigned_to_id": staff.staff_id,
            "assigned_to_email": staff.staff_email,
            "assigned_at": staff.assigned_at,
        });

        let response = self
            .request(Method::PATCH, "/rest/v1/orders")
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{id}")),
                ("assigned_to_id", "is.null".to_owned()),
            ])
            .json(&body)
            .send()
            .await?;

        let mut rows: Vec<OrderRecord> = read_json(response).await?;
        Ok(rows.pop())
    }

    /// Release an order held by `staff_id`.
    ///
    /// Filters on the holder, so only the current assignee's release lands;
    /// `None` means the order was not theirs to release.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn release_order(
        &self,
        id: OrderId,
        staff_id: UserId,
    ) -> Result<Option<OrderRecord>, SupabaseError> {
        let body = serde_json::json!({
            "assigned_to_id": null,
            "assigned_to_email": null,
            "assigned_at": null,
        });

        let response = self
            .request(Method::PATCH, "/rest/v1/orders")
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{id}")),
                ("assigned_to_id", format!("eq.{staff_id}")),
            ])
            .json(&body)
            .send()
            .await?;

        let mut rows: Vec<OrderRecord> = read_json(response).await?;
        Ok(rows.pop())
    }

    /// Set an order's status, gated on `staff_id` being the assignee.
    ///
    /// `None` means the order is not assigned to that staff member (or does
    /// not exist) and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        staff_id: UserId,
        status: OrderStatus,
    ) -> Result<Option<OrderRecord>, SupabaseError> {
        let body = serde_json::json!({ "status": status });

        let response = self
            .request(Method::PATCH, "/rest/v1/orders")
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{id}")),
                ("assigned_to_id", format!("eq.{staff_id}")),
            ])
            .json(&body)
            .send()
            .await?;

        let mut rows: Vec<OrderRecord> = read_json(response).await?;
        Ok(rows.pop())
    }
}

// =============================================================================
// Response handling
// =============================================================================

/// Check the response status, mapping failures to `SupabaseError`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body);

    if status == StatusCode::CONFLICT {
        return Err(SupabaseError::Conflict(message));
    }

    tracing::error!(status = %status, message = %message, "backend request failed");
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Read a success body as JSON.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SupabaseError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Read an auth endpoint body as JSON, mapping client errors to
/// [`SupabaseError::AuthRejected`] (GoTrue reports bad credentials and
/// refused signups as 400/401/422).
async fn read_auth_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SupabaseError> {
    let status = response.status();

    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(SupabaseError::AuthRejected(extract_error_message(&body)));
    }

    read_json(response).await
}
