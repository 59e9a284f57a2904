use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use models::{fee_structure, program::{self, NewProgram}};
use service::program_service;

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
pub struct ProgramBody {
    pub faculty_id: Uuid,
    pub name: String,
    pub code: String,
    pub duration_years: i32,
    pub level: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coordinator: String,
    #[serde(default)]
    pub student_capacity: i32,
    #[serde(default)]
    pub modules: String,
    #[serde(default)]
    pub entry_requirements: String,
}

impl From<ProgramBody> for NewProgram {
    fn from(b: ProgramBody) -> Self {
        NewProgram {
            faculty_id: b.faculty_id,
            name: b.name,
            code: b.code,
            duration_years: b.duration_years,
            level: b.level,
            description: b.description,
            coordinator: b.coordinator,
            student_capacity: b.student_capacity,
            modules: b.modules,
            entry_requirements: b.entry_requirements,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    faculty_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct FeeBody {
    semester_fee: Decimal,
}

async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<program::Model>>, JsonApiError> {
    Ok(Json(program_service::list_programs(&state.db, q.faculty_id).await?))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<ProgramBody>,
) -> Result<(StatusCode, Json<program::Model>), JsonApiError> {
    let created = program_service::create_program(&state.db, body.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<program::Model>, JsonApiError> {
    program_service::get_program(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("program not found"))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProgramBody>,
) -> Result<Json<program::Model>, JsonApiError> {
    Ok(Json(program_service::update_program(&state.db, id, body.into()).await?))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if program_service::delete_program(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("program not found"))
    }
}

async fn set_fee(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FeeBody>,
) -> Result<Json<fee_structure::Model>, JsonApiError> {
    Ok(Json(program_service::set_program_fee(&state.db, id, body.semester_fee).await?))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/programs", get(list).post(create))
        .route("/api/programs/:id", get(get_one).put(update).delete(delete))
        .route("/api/programs/:id/fee", post(set_fee))
}
