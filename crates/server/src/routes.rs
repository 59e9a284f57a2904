use axum::{middleware, routing::get, Json, Router};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::pagination::Pagination;

use crate::auth::{self, ServerState};

pub mod faculties;
pub mod innovation;
pub mod institutions;
pub mod iseop;
pub mod payments;
pub mod programs;
pub mod reports;
pub mod staff;
pub mod students;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Shared `page`/`per_page` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

/// Build the full application router: public health, auth, and the
/// bearer-protected `/api` surface.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    let auth_routes = Router::new()
        .route("/auth/register", axum::routing::post(auth::register))
        .route("/auth/login", axum::routing::post(auth::login))
        .route("/auth/me", get(auth::me));

    let api = Router::new()
        .merge(institutions::router())
        .merge(faculties::router())
        .merge(programs::router())
        .merge(students::router())
        .merge(staff::router())
        .merge(payments::router())
        .merge(innovation::router())
        .merge(iseop::router())
        .merge(reports::router());

    public
        .merge(auth_routes)
        .merge(api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
