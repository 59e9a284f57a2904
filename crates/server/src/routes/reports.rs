use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::{generated_report, report_template};
use service::auth::Claims;
use service::report::{
    self, ReportOutput, ReportPayload, ReportRequest, ReportSchema, TemplateInput,
};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

async fn list_schemas() -> Json<Vec<&'static ReportSchema>> {
    Json(report::schemas())
}

async fn get_schema(
    Path(report_type): Path<String>,
) -> Result<Json<&'static ReportSchema>, JsonApiError> {
    Ok(Json(report::get_schema(&report_type)?))
}

async fn generate(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ReportRequest>,
) -> Result<Response, JsonApiError> {
    let requested_by: Option<Uuid> = claims.uid.parse().ok();
    let title = report::get_schema(&body.report_type)
        .map(|s| s.title.to_string())
        .unwrap_or_else(|_| body.report_type.clone());
    let result = report::run_report(&state.db, &body).await;
    let status = if result.is_ok() { "completed" } else { "failed" };
    if let Err(e) =
        report::record_generation(&state.db, &body, &title, status, requested_by).await
    {
        tracing::warn!(err = %e, "failed to record report generation");
    }
    match result? {
        ReportOutput::Json(payload) => Ok(Json(payload).into_response()),
        ReportOutput::Pdf(bytes) => {
            let filename = format!("{}.pdf", body.report_type);
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response())
        }
    }
}

async fn preview(
    State(state): State<ServerState>,
    Json(body): Json<ReportRequest>,
) -> Result<Json<ReportPayload>, JsonApiError> {
    Ok(Json(report::preview_report(&state.db, &body).await?))
}

async fn list_templates(
    State(state): State<ServerState>,
) -> Result<Json<Vec<report_template::Model>>, JsonApiError> {
    Ok(Json(report::list_templates(&state.db).await?))
}

async fn create_template(
    State(state): State<ServerState>,
    Json(body): Json<TemplateInput>,
) -> Result<(StatusCode, Json<report_template::Model>), JsonApiError> {
    let created = report::create_template(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_template(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if report::deactivate_template(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("template not found"))
    }
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

async fn history(
    State(state): State<ServerState>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<generated_report::Model>>, JsonApiError> {
    let limit = q.limit.unwrap_or(20).min(100);
    Ok(Json(report::recent_generations(&state.db, limit).await?))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reports/schemas", get(list_schemas))
        .route("/api/reports/schemas/:report_type", get(get_schema))
        .route("/api/reports/generate", post(generate))
        .route("/api/reports/preview", post(preview))
        .route("/api/reports/templates", get(list_templates).post(create_template))
        .route("/api/reports/templates/:id", axum::routing::delete(delete_template))
        .route("/api/reports/history", get(history))
}
