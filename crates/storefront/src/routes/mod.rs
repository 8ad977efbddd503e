//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Backend reachability
//!
//! # Catalog
//! GET    /api/catalog                     - Configurator data (products, fonts, colors, tiers)
//!
//! # Cart (session-scoped)
//! GET    /api/cart                        - Cart contents and total
//! POST   /api/cart/items                  - Append a line item
//! DELETE /api/cart/items/{index}          - Remove by position (out of range = no-op)
//! DELETE /api/cart                        - Clear
//!
//! # Auth
//! POST   /api/auth/register               - Create an account
//! POST   /api/auth/login                  - Login, establishes the session
//! POST   /api/auth/logout                 - Logout
//! GET    /api/auth/me                     - Current session identity
//!
//! # Orders (requires auth)
//! POST   /api/orders                      - Create order from the session cart
//! GET    /api/orders                      - Own order history
//! GET    /api/orders/{id}                 - Own order detail
//!
//! # Checkout relay
//! POST   /api/create-payment-intent       - Relay {amount, orderId} to the payment API
//!
//! # Staff (requires staff role)
//! GET    /api/admin/orders                - All orders
//! POST   /api/admin/orders/{id}/assignment - Claim/release toggle
//! POST   /api/admin/orders/{id}/status    - Set status (assignee only)
//!
//! # SPA
//! (fallback)                              - Static assets, then index.html
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(middleware::auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route("/items/{index}", delete(cart::remove_item))
}

/// Create the order routes router (customer side).
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the staff routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::index))
        .route("/orders/{id}/assignment", post(admin::toggle_assignment))
        .route("/orders/{id}/status", post(admin::set_status))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
        .route("/api/catalog", get(catalog::show))
        .route(
            "/api/create-payment-intent",
            post(checkout::create_payment_intent),
        )
        .layer(middleware::api_rate_limiter())
}

/// Assemble the full application: API routes, health checks, session and
/// security layers, and the static SPA fallback.
///
/// Everything except the Sentry tower layers, which `main` adds outermost.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    let web_root = state.config().web_root.clone();
    let spa = ServeDir::new(&web_root)
        .not_found_service(ServeFile::new(web_root.join("index.html")));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .fallback_service(spa)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the hosted backend is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.supabase().health().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
