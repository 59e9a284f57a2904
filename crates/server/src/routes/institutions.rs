use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::institution::{self, NewInstitution};
use service::institution_service::{self, InstitutionFilter, InstitutionStats};

use super::PageQuery;
use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
pub struct InstitutionBody {
    pub name: String,
    pub kind: String,
    pub province: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub staff_count: i32,
    #[serde(default = "default_status")]
    pub status: String,
    pub established: i32,
    #[serde(default)]
    pub has_innovation_hub: bool,
}

fn default_status() -> String {
    "Active".to_string()
}

impl From<InstitutionBody> for NewInstitution {
    fn from(b: InstitutionBody) -> Self {
        NewInstitution {
            name: b.name,
            kind: b.kind,
            province: b.province,
            location: b.location,
            address: b.address,
            capacity: b.capacity,
            staff_count: b.staff_count,
            status: b.status,
            established: b.established,
            has_innovation_hub: b.has_innovation_hub,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageQuery,
    province: Option<String>,
    kind: Option<String>,
    status: Option<String>,
}

async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<institution::Model>>, JsonApiError> {
    let filter =
        InstitutionFilter { province: q.province, kind: q.kind, status: q.status };
    let rows = institution_service::list_institutions(&state.db, filter, q.page.pagination())
        .await?;
    Ok(Json(rows))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<InstitutionBody>,
) -> Result<(StatusCode, Json<institution::Model>), JsonApiError> {
    let created = institution_service::create_institution(&state.db, body.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<institution::Model>, JsonApiError> {
    institution_service::get_institution(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("institution not found"))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<InstitutionBody>,
) -> Result<Json<institution::Model>, JsonApiError> {
    let updated = institution_service::update_institution(&state.db, id, body.into()).await?;
    Ok(Json(updated))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if institution_service::delete_institution(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("institution not found"))
    }
}

async fn stats(
    State(state): State<ServerState>,
) -> Result<Json<InstitutionStats>, JsonApiError> {
    Ok(Json(institution_service::institution_stats(&state.db).await?))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/institutions", get(list).post(create))
        .route("/api/institutions/stats", get(stats))
        .route("/api/institutions/:id", get(get_one).put(update).delete(delete))
}
