//! End-to-end tests for the staff order board: assignment exclusivity,
//! toggle-release semantics, and assignee-only status changes.

use neon_pulse_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn toggle_assignment(
    ctx: &TestContext,
    client: &reqwest::Client,
    order_id: &str,
) -> reqwest::Response {
    client
        .post(format!(
            "{}/api/admin/orders/{order_id}/assignment",
            ctx.base_url
        ))
        .send()
        .await
        .expect("assignment request failed")
}

async fn set_status(
    ctx: &TestContext,
    client: &reqwest::Client,
    order_id: &str,
    status: &str,
) -> reqwest::Response {
    client
        .post(format!(
            "{}/api/admin/orders/{order_id}/status",
            ctx.base_url
        ))
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("status request failed")
}

#[tokio::test]
async fn test_claim_deny_release_flow() {
    let ctx = TestContext::spawn().await;

    // A customer places an order
    let customer = ctx
        .login_as("ada@example.com", "correct horse battery", "user")
        .await;
    ctx.add_sign(&customer, "Neon", 1).await;
    let order = ctx.create_order(&customer).await;
    let order_id = order["id"].as_str().expect("order id missing");

    let alice = ctx
        .login_as("alice@neonpulse.shop", "staff password 1", "admin")
        .await;
    let bob = ctx
        .login_as("bob@neonpulse.shop", "staff password 2", "admin")
        .await;

    // The board shows the order to staff
    let board: Value = alice
        .get(format!("{}/api/admin/orders", ctx.base_url))
        .send()
        .await
        .expect("board request failed")
        .json()
        .await
        .expect("board response not JSON");
    assert_eq!(board.as_array().map(Vec::len), Some(1));
    assert_eq!(board[0]["assignedTo"], Value::Null);

    // Alice claims the unassigned order
    let response = toggle_assignment(&ctx, &alice, order_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("not JSON");
    assert_eq!(body["action"], "claimed");
    assert_eq!(
        body["order"]["assignedTo"]["staffEmail"],
        "alice@neonpulse.shop"
    );

    // Bob's claim bounces, naming the holder, and changes nothing
    let response = toggle_assignment(&ctx, &bob, order_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("not JSON");
    assert!(
        body["error"]
            .as_str()
            .expect("error message missing")
            .contains("alice@neonpulse.shop")
    );

    // Bob cannot change the status either - that is the assignee's call
    let response = set_status(&ctx, &bob, order_id, "in-progress").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Alice can
    let response = set_status(&ctx, &alice, order_id, "in-progress").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("not JSON");
    assert_eq!(body["status"], "in-progress");

    // Alice's second toggle releases the order
    let response = toggle_assignment(&ctx, &alice, order_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("not JSON");
    assert_eq!(body["action"], "released");
    assert_eq!(body["order"]["assignedTo"], Value::Null);

    // Now Bob can take it
    let response = toggle_assignment(&ctx, &bob, order_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("not JSON");
    assert_eq!(body["action"], "claimed");
    assert_eq!(
        body["order"]["assignedTo"]["staffEmail"],
        "bob@neonpulse.shop"
    );
}

#[tokio::test]
async fn test_status_is_free_between_enum_values_for_the_assignee() {
    let ctx = TestContext::spawn().await;

    let customer = ctx
        .login_as("ada@example.com", "correct horse battery", "user")
        .await;
    ctx.add_sign(&customer, "Neon", 1).await;
    let order = ctx.create_order(&customer).await;
    let order_id = order["id"].as_str().expect("order id missing");

    let alice = ctx
        .login_as("alice@neonpulse.shop", "staff password 1", "admin")
        .await;
    toggle_assignment(&ctx, &alice, order_id).await;

    // Any status from any other, including walking backwards
    for status in ["completed", "pending", "cancelled", "in-progress"] {
        let response = set_status(&ctx, &alice, order_id, status).await;
        assert_eq!(response.status(), StatusCode::OK, "setting {status}");
    }

    // But not a value outside the enum
    let response = set_status(&ctx, &alice, order_id, "shipped").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_board_requires_the_staff_role() {
    let ctx = TestContext::spawn().await;

    let customer = ctx
        .login_as("ada@example.com", "correct horse battery", "user")
        .await;
    let response = customer
        .get(format!("{}/api/admin/orders", ctx.base_url))
        .send()
        .await
        .expect("board request failed");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let anonymous = TestContext::new_client();
    let response = anonymous
        .get(format!("{}/api/admin/orders", ctx.base_url))
        .send()
        .await
        .expect("board request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customers_see_only_their_own_orders() {
    let ctx = TestContext::spawn().await;

    let ada = ctx
        .login_as("ada@example.com", "correct horse battery", "user")
        .await;
    ctx.add_sign(&ada, "Neon", 1).await;
    let order = ctx.create_order(&ada).await;
    let order_id = order["id"].as_str().expect("order id missing");

    let grace = ctx
        .login_as("grace@example.com", "another password", "user")
        .await;

    // Grace's history is empty
    let history: Value = grace
        .get(format!("{}/api/orders", ctx.base_url))
        .send()
        .await
        .expect("history request failed")
        .json()
        .await
        .expect("history response not JSON");
    assert_eq!(history.as_array().map(Vec::len), Some(0));

    // Ada's order reads as not-found for Grace
    let response = grace
        .get(format!("{}/api/orders/{order_id}", ctx.base_url))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And as found for Ada
    let response = ada
        .get(format!("{}/api/orders/{order_id}", ctx.base_url))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(response.status(), StatusCode::OK);
}
