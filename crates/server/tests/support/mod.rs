#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use ::common::crypto::KeyRing;
use server::auth::{ServerAuthConfig, ServerState};
use server::routes;

pub fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok()
}

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

pub async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    // Repeated runs may hit already-applied migrations; ignore those
    if let Err(e) = migration::Migrator::up(&db, None).await {
        let msg = format!("{}", e);
        if msg.contains("duplicate key value violates unique constraint") {
            eprintln!("migrations already applied, continue: {}", msg);
        } else {
            return Err(e.into());
        }
    }
    let keys = Arc::new(KeyRing::from_keys(&[KeyRing::generate_key()])?);
    let state = ServerState {
        db,
        auth: ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12 },
        keys,
    };
    Ok(routes::build_router(cors(), state))
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok((status, value))
}

/// Send a request and return the raw response for non-JSON bodies.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> anyhow::Result<axum::response::Response> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let req = builder.body(Body::from(body))?;
    Ok(app.clone().call(req).await?)
}

/// Build a multipart body with an `institution_id` text field and a
/// single `file` field, as the bulk upload endpoints expect.
pub fn multipart_upload(
    institution_id: Uuid,
    filename: &str,
    file_bytes: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "----tims-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"institution_id\"\r\n\r\n",
    );
    body.extend_from_slice(format!("{institution_id}\r\n").as_bytes());
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Register a fresh user and return a bearer token.
pub async fn login_token(app: &Router) -> anyhow::Result<String> {
    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    let (status, _) = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": "Tester", "password": password, "role": "admin"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "register failed: {status}");
    let (status, body) = send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {status}");
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}
