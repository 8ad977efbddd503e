//! Integration test harness for NeonPulse.
//!
//! Spawns the real storefront (the same `routes::app` the binary serves)
//! on an ephemeral port, with both upstream APIs replaced by in-process
//! mocks:
//!
//! - [`MockBackend`] - the hosted identity/database backend (auth endpoints
//!   plus the `users` and `orders` tables with PostgREST-style filters)
//! - [`MockStripe`] - the payment API, recording every intent request
//!
//! Tests drive the storefront over HTTP with a cookie-holding `reqwest`
//! client, exactly like the SPA does.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

use neon_pulse_storefront::config::{StorefrontConfig, StripeConfig, SupabaseConfig};
use neon_pulse_storefront::routes;
use neon_pulse_storefront::state::AppState;

// =============================================================================
// Mock backend (identity + rows)
// =============================================================================

#[derive(Debug, Clone)]
struct MockAccount {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: Vec<MockAccount>,
    profiles: Vec<Value>,
    orders: Vec<Value>,
}

/// In-process stand-in for the hosted backend.
#[derive(Clone)]
pub struct MockBackend {
    /// Base URL the storefront is pointed at.
    pub url: String,
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    /// Bind the mock on an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(BackendState::default()));

        let router = Router::new()
            .route("/auth/v1/health", get(|| async { Json(json!({})) }))
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/token", post(token))
            .route(
                "/rest/v1/users",
                get(select_users).post(insert_user).patch(update_users),
            )
            .route(
                "/rest/v1/orders",
                get(select_orders).post(insert_order).patch(update_orders),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock backend server failed");
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Seed an account plus its profile row. Returns the account ID.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn seed_user(&self, email: &str, password: &str, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut state = self.state.lock().expect("backend state poisoned");

        state.accounts.push(MockAccount {
            id,
            email: email.to_owned(),
            password: password.to_owned(),
        });
        state.profiles.push(json!({
            "id": id,
            "email": email,
            "phone_number": "+33600000000",
            "role": role,
            "created_at": chrono::Utc::now(),
            "last_login": null,
        }));

        id
    }

    /// Number of stored orders.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.state.lock().expect("backend state poisoned").orders.len()
    }
}

type Backend = Arc<Mutex<BackendState>>;

async fn signup(State(state): State<Backend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    let password = body["password"].as_str().unwrap_or_default().to_owned();

    let mut state = state.lock().expect("backend state poisoned");

    if state.accounts.iter().any(|a| a.email == email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "User already registered" })),
        )
            .into_response();
    }

    let id = Uuid::new_v4();
    state.accounts.push(MockAccount {
        id,
        email: email.clone(),
        password,
    });

    Json(json!({ "id": id, "email": email })).into_response()
}

async fn token(
    State(state): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if params.get("grant_type").map(String::as_str) != Some("password") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_description": "unsupported grant type" })),
        )
            .into_response();
    }

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let state = state.lock().expect("backend state poisoned");
    let account = state
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password);

    match account {
        Some(account) => Json(json!({
            "access_token": "mock-access-token",
            "token_type": "bearer",
            "user": { "id": account.id, "email": account.email },
        }))
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_description": "Invalid login credentials" })),
        )
            .into_response(),
    }
}

/// PostgREST-style filter match: `eq.<value>` and `is.null`.
fn matches_filters(row: &Value, params: &HashMap<String, String>) -> bool {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != "select" && key.as_str() != "order")
        .all(|(key, filter)| {
            let field = row.get(key.as_str()).unwrap_or(&Value::Null);
            if let Some(want) = filter.strip_prefix("eq.") {
                match field {
                    Value::String(s) => s == want,
                    other => other.to_string() == want,
                }
            } else if filter == "is.null" {
                field.is_null()
            } else {
                false
            }
        })
}

fn merge_patch(row: &mut Value, patch: &Value) {
    if let (Some(target), Some(source)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn sort_newest_first(rows: &mut [Value], params: &HashMap<String, String>) {
    if params.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.sort_by(|a, b| {
            let a = a["created_at"].as_str().unwrap_or_default();
            let b = b["created_at"].as_str().unwrap_or_default();
            b.cmp(a)
        });
    }
}

async fn select_users(
    State(state): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = state.lock().expect("backend state poisoned");
    let rows: Vec<Value> = state
        .profiles
        .iter()
        .filter(|row| matches_filters(row, &params))
        .cloned()
        .collect();
    Json(Value::Array(rows))
}

async fn insert_user(State(state): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().expect("backend state poisoned");
    state.profiles.push(body.clone());
    Json(Value::Array(vec![body]))
}

async fn update_users(
    State(state): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().expect("backend state poisoned");
    let mut updated = Vec::new();

    for row in &mut state.profiles {
        if matches_filters(row, &params) {
            merge_patch(row, &body);
            updated.push(row.clone());
        }
    }

    Json(Value::Array(updated))
}

async fn select_orders(
    State(state): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = state.lock().expect("backend state poisoned");
    let mut rows: Vec<Value> = state
        .orders
        .iter()
        .filter(|row| matches_filters(row, &params))
        .cloned()
        .collect();
    sort_newest_first(&mut rows, &params);
    Json(Value::Array(rows))
}

async fn insert_order(State(state): State<Backend>, Json(mut body): Json<Value>) -> Json<Value> {
    if let Some(row) = body.as_object_mut() {
        row.insert("id".to_owned(), json!(Uuid::new_v4()));
    }

    let mut state = state.lock().expect("backend state poisoned");
    state.orders.push(body.clone());
    Json(Value::Array(vec![body]))
}

async fn update_orders(
    State(state): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().expect("backend state poisoned");
    let mut updated = Vec::new();

    for row in &mut state.orders {
        if matches_filters(row, &params) {
            merge_patch(row, &body);
            updated.push(row.clone());
        }
    }

    Json(Value::Array(updated))
}

// =============================================================================
// Mock payment API
// =============================================================================

#[derive(Default)]
struct StripeState {
    requests: Mutex<Vec<HashMap<String, String>>>,
    fail_next: AtomicBool,
}

/// In-process stand-in for the payment API.
#[derive(Clone)]
pub struct MockStripe {
    /// Base URL the storefront is pointed at.
    pub url: String,
    state: Arc<StripeState>,
}

impl MockStripe {
    /// Bind the mock on an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(StripeState::default());

        let router = Router::new()
            .route("/v1/payment_intents", post(create_intent))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("failed to bind mock stripe");
        let addr = listener.local_addr().expect("mock stripe has no address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock stripe server failed");
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Every intent request the storefront has made, as raw form fields.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state
            .requests
            .lock()
            .expect("stripe state poisoned")
            .clone()
    }

    /// Make the next intent request fail like a declined card.
    pub fn fail_next(&self) {
        self.state.fail_next.store(true, Ordering::SeqCst);
    }
}

async fn create_intent(
    State(state): State<Arc<StripeState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    if state.fail_next.swap(false, Ordering::SeqCst) {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "error": {
                    "message": "Your card was declined.",
                    "type": "card_error",
                }
            })),
        )
            .into_response();
    }

    let amount: i64 = params
        .get("amount")
        .and_then(|a| a.parse().ok())
        .unwrap_or_default();
    let currency = params
        .get("currency")
        .cloned()
        .unwrap_or_else(|| "eur".to_owned());

    state
        .requests
        .lock()
        .expect("stripe state poisoned")
        .push(params);

    Json(json!({
        "id": "pi_mock_1",
        "object": "payment_intent",
        "client_secret": "pi_mock_1_secret_test",
        "amount": amount,
        "currency": currency,
        "status": "requires_payment_method",
    }))
    .into_response()
}

// =============================================================================
// Test context
// =============================================================================

/// A spawned storefront with its two upstream mocks.
pub struct TestContext {
    /// Base URL of the spawned storefront.
    pub base_url: String,
    pub backend: MockBackend,
    pub stripe: MockStripe,
}

impl TestContext {
    /// Spawn the mocks and the storefront, all on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics if any listener cannot be bound.
    pub async fn spawn() -> Self {
        let backend = MockBackend::spawn().await;
        let stripe = MockStripe::spawn().await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost".to_owned(),
            session_secret: SecretString::from("test-session-secret-0123456789abcdef"),
            web_root: PathBuf::from("dist"),
            supabase: SupabaseConfig {
                url: backend.url.clone(),
                service_key: SecretString::from("test-service-key"),
            },
            stripe: StripeConfig {
                api_base: stripe.url.clone(),
                api_version: "2023-10-16".to_owned(),
                secret_key: SecretString::from("sk_test_mock"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config);
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("failed to bind storefront");
        let addr = listener.local_addr().expect("storefront has no address");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("storefront server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            backend,
            stripe,
        }
    }

    /// A fresh client with its own cookie jar (its own session).
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client")
    }

    /// Seed a user, log them in with a fresh client, return the client.
    ///
    /// # Panics
    ///
    /// Panics if the login does not succeed.
    pub async fn login_as(&self, email: &str, password: &str, role: &str) -> Client {
        self.backend.seed_user(email, password, role);

        let client = Self::new_client();
        let response = client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK, "login failed");

        client
    }

    /// Add a customized sign to the client's cart.
    ///
    /// # Panics
    ///
    /// Panics if the request does not succeed.
    pub async fn add_sign(&self, client: &Client, text: &str, quantity: u32) {
        let response = client
            .post(format!("{}/api/cart/items", self.base_url))
            .json(&json!({
                "productId": "neon-custom",
                "quantity": quantity,
                "customization": { "text": text, "font": "dancing", "color": "purple" },
            }))
            .send()
            .await
            .expect("add-to-cart request failed");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Create an order from the client's cart with complete shipping
    /// details. Returns the order JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request does not succeed.
    pub async fn create_order(&self, client: &Client) -> Value {
        let response = client
            .post(format!("{}/api/orders", self.base_url))
            .json(&shipping_details())
            .send()
            .await
            .expect("order request failed");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        response.json().await.expect("order response not JSON")
    }
}

/// A complete shipping form.
#[must_use]
pub fn shipping_details() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "phone": "+33612345678",
        "address": "1 rue de la Paix",
        "addressComplement": "Apt 2",
        "city": "Paris",
        "postalCode": "75002",
        "country": "FR",
    })
}
