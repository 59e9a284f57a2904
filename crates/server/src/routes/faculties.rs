use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::faculty;
use service::faculty_service::{self, FacultyInput};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
struct ListQuery {
    institution_id: Option<Uuid>,
}

async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<faculty::Model>>, JsonApiError> {
    Ok(Json(faculty_service::list_faculties(&state.db, q.institution_id).await?))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<FacultyInput>,
) -> Result<(StatusCode, Json<faculty::Model>), JsonApiError> {
    let created = faculty_service::create_faculty(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<faculty::Model>, JsonApiError> {
    faculty_service::get_faculty(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("faculty not found"))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FacultyInput>,
) -> Result<Json<faculty::Model>, JsonApiError> {
    Ok(Json(faculty_service::update_faculty(&state.db, id, body).await?))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if faculty_service::delete_faculty(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("faculty not found"))
    }
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/faculties", get(list).post(create))
        .route("/api/faculties/:id", get(get_one).put(update).delete(delete))
}
