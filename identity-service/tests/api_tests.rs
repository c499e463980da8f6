mod common;

use chrono::Duration;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_account_success() {
    let app = TestApp::spawn().await;

    let response = app.register("Alice@Example.com", "pw1").await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password_hash").is_none());

    let event = app
        .notifier
        .wait_for("alice@example.com")
        .await
        .expect("No confirmation request recorded");
    assert_eq!(app.notifier.events().await.len(), 1);
    assert!(event
        .confirmation_url
        .ends_with("/api/accounts/confirm?email=alice%40example.com"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("a@x.com", "pw1").await;
    assert!(app.notifier.wait_for("a@x.com").await.is_some());
    let response = app.register("a@x.com", "pw2").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
    assert_eq!(app.accounts.count().await, 1);
    assert_eq!(app.notifier.events().await.len(), 1);
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = TestApp::spawn().await;

    let bad_email = app.register("not-an-email", "pw1").await;
    let empty_password = app.register("a@x.com", "").await;

    let display_name = app.register("Alice <alice@example.com>", "pw1").await;

    assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(empty_password.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(display_name.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.accounts.count().await, 0);
}

#[tokio::test]
async fn test_register_succeeds_when_notifier_fails() {
    let app = TestApp::spawn_with_failing_notifier().await;

    let response = app.register("a@x.com", "pw1").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.accounts.count().await, 1);
}

#[tokio::test]
async fn test_sign_in_requires_confirmation() {
    let app = TestApp::spawn().await;

    app.register("a@x.com", "pw1").await;

    let before = app.sign_in("a@x.com", "pw1").await;
    assert_eq!(before.status(), StatusCode::FORBIDDEN);

    let confirmed = app.confirm("a@x.com").await;
    assert_eq!(confirmed.status(), StatusCode::OK);
    let body: serde_json::Value = confirmed.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["confirmed"], true);

    let after = app.sign_in("a@x.com", "pw1").await;
    assert_eq!(after.status(), StatusCode::OK);

    let body: serde_json::Value = after.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(body["data"]["refresh_token"].as_str().unwrap().len(), 128);
}

#[tokio::test]
async fn test_confirm_is_idempotent() {
    let app = TestApp::spawn().await;

    app.register("a@x.com", "pw1").await;

    assert_eq!(app.confirm("a@x.com").await.status(), StatusCode::OK);
    assert_eq!(app.confirm("a@x.com").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_confirm_unknown_account() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/accounts/confirm?email=ghost%40x.com")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let app = TestApp::spawn().await;

    app.register("a@x.com", "pw1").await;
    app.confirm("a@x.com").await;

    let response = app.sign_in("a@x.com", "wrong").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_in_unregistered_account() {
    let app = TestApp::spawn().await;

    let response = app.sign_in("nobody@x.com", "wrongpw").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_repeated_sign_in_reuses_session() {
    let app = TestApp::spawn().await;

    let first = app.signed_in("a@x.com", "pw1").await;

    let second: serde_json::Value = app
        .sign_in("a@x.com", "pw1")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let second = &second["data"];

    assert_ne!(first["refresh_token"], second["refresh_token"]);
    assert_eq!(app.sessions.count().await, 1);

    // The first refresh token was overwritten by the second sign-in.
    let stale = app
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": first["refresh_token"] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    for tokens in [&first, second] {
        let response = app
            .post("/api/auth/validate")
            .json(&json!({ "token": tokens["access_token"] }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_full_account_workflow() {
    let app = TestApp::spawn().await;

    let tokens = app.signed_in("a@x.com", "pw1").await;

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": tokens["access_token"] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], true);

    let me = app
        .get_authenticated(
            "/api/accounts/me",
            tokens["access_token"].as_str().unwrap(),
        )
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(me.status(), StatusCode::OK);
    let body: serde_json::Value = me.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["is_confirmed"], true);
}

#[tokio::test]
async fn test_validate_rejects_tampered_token() {
    let app = TestApp::spawn().await;

    let tokens = app.signed_in("a@x.com", "pw1").await;
    let token = tokens["access_token"].as_str().unwrap();

    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}.{}{}", unsigned, flipped, &signature[1..]);

    for candidate in [tampered.as_str(), "garbage"] {
        let response = app
            .post("/api/auth/validate")
            .json(&json!({ "token": candidate }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_zero_ttl_access_token_is_expired() {
    let app = TestApp::spawn_with_access_ttl(Duration::zero()).await;

    let tokens = app.signed_in("a@x.com", "pw1").await;

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": tokens["access_token"] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("expired"));
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::spawn().await;

    let tokens = app.signed_in("a@x.com", "pw1").await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": tokens["refresh_token"] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_ne!(body["data"]["refresh_token"], tokens["refresh_token"]);
    assert_eq!(app.sessions.count().await, 1);

    let replay = app
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": tokens["refresh_token"] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_missing_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/accounts/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
