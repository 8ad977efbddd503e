//! End-to-end tests for account registration, login, and the session.

use neon_pulse_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_login_me_logout() {
    let ctx = TestContext::spawn().await;
    let client = TestContext::new_client();

    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct horse battery",
            "phoneNumber": "+33612345678",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("register response not JSON");
    assert_eq!(body["email"], "ada@example.com");

    let response = client
        .post(format!("{}/api/auth/login", ctx.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct horse battery",
        }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("login response not JSON");
    assert_eq!(body["role"], "user");

    let response = client
        .get(format!("{}/api/auth/me", ctx.base_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("me response not JSON");
    assert_eq!(body["email"], "ada@example.com");

    let response = client
        .post(format!("{}/api/auth/logout", ctx.base_url))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/api/auth/me", ctx.base_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let ctx = TestContext::spawn().await;
    ctx.backend
        .seed_user("ada@example.com", "correct horse battery", "user");

    let client = TestContext::new_client();
    let response = client
        .post(format!("{}/api/auth/login", ctx.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "password": "wrong password entirely",
        }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::spawn().await;
    let client = TestContext::new_client();

    let body = json!({
        "email": "ada@example.com",
        "password": "correct horse battery",
        "phoneNumber": "+33612345678",
    });

    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&body)
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&body)
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validates_input() {
    let ctx = TestContext::spawn().await;
    let client = TestContext::new_client();

    // Weak password
    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "password": "short",
            "phoneNumber": "+33612345678",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed email
    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&json!({
            "email": "not-an-email",
            "password": "correct horse battery",
            "phoneNumber": "+33612345678",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing phone
    let response = client
        .post(format!("{}/api/auth/register", ctx.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct horse battery",
            "phoneNumber": "  ",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
