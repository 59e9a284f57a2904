use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::staff;
use service::bulk::{self, BulkOutcome};
use service::staff_service::{self, StaffFilter, StaffInput};

use super::students::read_upload;
use super::PageQuery;
use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageQuery,
    institution_id: Option<Uuid>,
    faculty_id: Option<Uuid>,
    position: Option<String>,
    is_active: Option<bool>,
}

async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<staff::Model>>, JsonApiError> {
    let filter = StaffFilter {
        institution_id: q.institution_id,
        faculty_id: q.faculty_id,
        position: q.position,
        is_active: q.is_active,
    };
    Ok(Json(staff_service::list_staff(&state.db, filter, q.page.pagination()).await?))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<StaffInput>,
) -> Result<(StatusCode, Json<staff::Model>), JsonApiError> {
    let created = staff_service::create_staff(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<staff::Model>, JsonApiError> {
    staff_service::get_staff(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("staff member not found"))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StaffInput>,
) -> Result<Json<staff::Model>, JsonApiError> {
    Ok(Json(staff_service::update_staff(&state.db, id, body).await?))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if staff_service::deactivate_staff(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("staff member not found"))
    }
}

async fn bulk_upload(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<BulkOutcome>, JsonApiError> {
    let upload = read_upload(multipart).await?;
    let outcome =
        bulk::import_staff(&state.db, upload.institution_id, &upload.filename, &upload.bytes)
            .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/staff", get(list).post(create))
        .route("/api/staff/bulk-upload", post(bulk_upload))
        .route("/api/staff/:id", get(get_one).put(update).delete(delete))
}
