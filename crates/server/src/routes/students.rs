use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::student;
use service::bulk::{self, BulkOutcome};
use service::student_service::{self, GraduationStats, StudentFilter, StudentInput};

use super::PageQuery;
use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(flatten)]
    page: PageQuery,
    institution_id: Option<Uuid>,
    program_id: Option<Uuid>,
    status: Option<String>,
    enrollment_year: Option<i32>,
}

async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<student::Model>>, JsonApiError> {
    let filter = StudentFilter {
        institution_id: q.institution_id,
        program_id: q.program_id,
        status: q.status,
        enrollment_year: q.enrollment_year,
    };
    let rows =
        student_service::list_students(&state.db, &state.keys, filter, q.page.pagination())
            .await?;
    Ok(Json(rows))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<StudentInput>,
) -> Result<(StatusCode, Json<student::Model>), JsonApiError> {
    let created = student_service::create_student(&state.db, &state.keys, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<student::Model>, JsonApiError> {
    student_service::get_student(&state.db, &state.keys, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("student not found"))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StudentInput>,
) -> Result<Json<student::Model>, JsonApiError> {
    Ok(Json(student_service::update_student(&state.db, &state.keys, id, body).await?))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if student_service::delete_student(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("student not found"))
    }
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    institution_id: Option<Uuid>,
}

async fn graduation_stats(
    State(state): State<ServerState>,
    Query(q): Query<StatsQuery>,
) -> Result<Json<GraduationStats>, JsonApiError> {
    Ok(Json(student_service::graduation_stats(&state.db, q.institution_id).await?))
}

/// Multipart upload: an `institution_id` text field plus one CSV/XLSX
/// `file` field.
pub(super) struct UploadParts {
    pub institution_id: Uuid,
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub(super) async fn read_upload(mut multipart: Multipart) -> Result<UploadParts, JsonApiError> {
    let mut institution_id: Option<Uuid> = None;
    let mut filename = String::new();
    let mut bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "institution_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| JsonApiError::bad_request(e.to_string()))?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| JsonApiError::bad_request("invalid institution_id"))?;
                institution_id = Some(id);
            }
            "file" => {
                filename = field.file_name().unwrap_or("upload.csv").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| JsonApiError::bad_request(e.to_string()))?;
                bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }
    let institution_id = institution_id
        .ok_or_else(|| JsonApiError::bad_request("missing institution_id field"))?;
    let bytes = bytes.ok_or_else(|| JsonApiError::bad_request("missing file field"))?;
    Ok(UploadParts { institution_id, filename, bytes })
}

async fn bulk_upload(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<BulkOutcome>, JsonApiError> {
    let upload = read_upload(multipart).await?;
    let outcome = bulk::import_students(
        &state.db,
        &state.keys,
        upload.institution_id,
        &upload.filename,
        &upload.bytes,
    )
    .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/students", get(list).post(create))
        .route("/api/students/graduation-stats", get(graduation_stats))
        .route("/api/students/bulk-upload", post(bulk_upload))
        .route("/api/students/:id", get(get_one).put(update).delete(delete))
}
