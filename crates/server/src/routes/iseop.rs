use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::{iseop_program, iseop_student};
use service::iseop_service::{self, IseopProgramInput, IseopStudentInput};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
struct ScopeQuery {
    institution_id: Option<Uuid>,
}

async fn list_programs(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<Vec<iseop_program::Model>>, JsonApiError> {
    Ok(Json(iseop_service::list_iseop_programs(&state.db, q.institution_id).await?))
}

async fn create_program(
    State(state): State<ServerState>,
    Json(body): Json<IseopProgramInput>,
) -> Result<(StatusCode, Json<iseop_program::Model>), JsonApiError> {
    let created = iseop_service::create_iseop_program(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_program(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<IseopProgramInput>,
) -> Result<Json<iseop_program::Model>, JsonApiError> {
    Ok(Json(iseop_service::update_iseop_program(&state.db, id, body).await?))
}

async fn delete_program(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if iseop_service::delete_iseop_program(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("program not found"))
    }
}

async fn list_students(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<Vec<iseop_student::Model>>, JsonApiError> {
    Ok(Json(iseop_service::list_iseop_students(&state.db, &state.keys, q.institution_id).await?))
}

async fn create_student(
    State(state): State<ServerState>,
    Json(body): Json<IseopStudentInput>,
) -> Result<(StatusCode, Json<iseop_student::Model>), JsonApiError> {
    let created = iseop_service::create_iseop_student(&state.db, &state.keys, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_student(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<iseop_student::Model>, JsonApiError> {
    iseop_service::get_iseop_student(&state.db, &state.keys, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("student not found"))
}

async fn update_student(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<IseopStudentInput>,
) -> Result<Json<iseop_student::Model>, JsonApiError> {
    Ok(Json(iseop_service::update_iseop_student(&state.db, &state.keys, id, body).await?))
}

async fn delete_student(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if iseop_service::delete_iseop_student(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("student not found"))
    }
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/iseop/programs", get(list_programs).post(create_program))
        .route(
            "/api/iseop/programs/:id",
            axum::routing::put(update_program).delete(delete_program),
        )
        .route("/api/iseop/students", get(list_students).post(create_student))
        .route(
            "/api/iseop/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}
