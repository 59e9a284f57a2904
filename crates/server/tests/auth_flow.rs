mod support;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use support::{build_app, login_token, send_json, skip_db_tests};

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("flow_{}@example.com", Uuid::new_v4());
    let password = "correct-horse-9";

    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": "Flow Tester", "password": password})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "register: {body}");
    assert_eq!(body["email"], email.as_str());

    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "login: {body}");
    let token = body["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty(), "login response carries a token");

    let (status, body) = send_json(&app, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "me: {body}");
    assert_eq!(body["email"], email.as_str());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let payload = json!({"email": email, "name": "Dup", "password": "long-enough-1"});

    let (status, _) = send_json(&app, "POST", "/auth/register", None, Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, "POST", "/auth/register", None, Some(payload)).await?;
    assert_eq!(status, StatusCode::CONFLICT, "second register: {body}");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("badpw_{}@example.com", Uuid::new_v4());
    let (status, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": "Bad", "password": "long-enough-1"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "not-the-password"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn api_requires_a_bearer_token() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;

    let (status, body) = send_json(&app, "GET", "/api/institutions", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized", "401 carries a JSON body: {body}");
    assert!(!body["message"].as_str().unwrap_or_default().is_empty());

    let (status, body) =
        send_json(&app, "GET", "/api/institutions", Some("not-a-real-token"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized", "401 carries a JSON body: {body}");

    let token = login_token(&app).await?;
    let (status, _) = send_json(&app, "GET", "/api/institutions", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let (status, body) = send_json(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}
