use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use common::crypto::KeyRing;
use service::auth::{
    domain::{LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
    Claims,
};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub keys: Arc<KeyRing>,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: self.auth.jwt_secret.clone(),
                token_ttl_hours: self.auth.token_ttl_hours,
                password_algorithm: "argon2".into(),
            },
        )
    }
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub institution_id: Option<Uuid>,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, JsonApiError> {
    let svc = state.auth_service();
    let user = svc.register(input).await.map_err(map_auth_error)?;
    Ok(Json(RegisterOutput { user_id: user.id, email: user.email, role: user.role }))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let svc = state.auth_service();
    let session = svc.login(input).await.map_err(map_auth_error)?;
    let user = session.user;
    Ok(Json(LoginOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token: session.token,
    }))
}

pub async fn me(
    State(state): State<ServerState>,
    req: Request,
) -> Result<Json<MeOutput>, JsonApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| JsonApiError::unauthorized("missing bearer token"))?;
    let svc = state.auth_service();
    let user = svc.current_user(&claims).await.map_err(map_auth_error)?;
    Ok(Json(MeOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        institution_id: user.institution_id,
    }))
}

fn map_auth_error(e: service::auth::errors::AuthError) -> JsonApiError {
    use service::auth::errors::AuthError;
    match e {
        AuthError::Validation(msg) => JsonApiError::bad_request(msg),
        AuthError::Conflict => JsonApiError {
            status: StatusCode::CONFLICT,
            error: "conflict",
            message: "user already exists".into(),
        },
        AuthError::NotFound => JsonApiError::not_found("user not found"),
        AuthError::Unauthorized => JsonApiError::unauthorized("invalid credentials"),
        other => JsonApiError::internal(other.to_string()),
    }
}

/// Verify `Authorization: Bearer <jwt>` on every request that is not on
/// the public whitelist. Valid claims are stored in request extensions
/// for downstream handlers; rejections carry the usual JSON error body.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path();
    let method = req.method().clone();

    if path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = match authz {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(JsonApiError::unauthorized("expected a Bearer token"));
            }
            h[prefix.len()..].to_string()
        }
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(JsonApiError::unauthorized("missing bearer token"));
        }
    };

    match state.auth_service().verify_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
