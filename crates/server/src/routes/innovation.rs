use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::{innovation_hub, partnership, project, research_grant};
use service::innovation_service::{
    self, GrantInput, HubInput, PartnershipInput, PipelineStats, ProjectFilter, ProjectInput,
};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
struct ScopeQuery {
    institution_id: Option<Uuid>,
}

async fn list_hubs(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<Vec<innovation_hub::Model>>, JsonApiError> {
    Ok(Json(innovation_service::list_hubs(&state.db, q.institution_id).await?))
}

async fn create_hub(
    State(state): State<ServerState>,
    Json(body): Json<HubInput>,
) -> Result<(StatusCode, Json<innovation_hub::Model>), JsonApiError> {
    let created = innovation_service::create_hub(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_hub(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<HubInput>,
) -> Result<Json<innovation_hub::Model>, JsonApiError> {
    Ok(Json(innovation_service::update_hub(&state.db, id, body).await?))
}

async fn delete_hub(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if innovation_service::delete_hub(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("hub not found"))
    }
}

#[derive(Debug, Deserialize)]
struct ProjectQuery {
    institution_id: Option<Uuid>,
    sector: Option<String>,
    stage: Option<String>,
}

async fn list_projects(
    State(state): State<ServerState>,
    Query(q): Query<ProjectQuery>,
) -> Result<Json<Vec<project::Model>>, JsonApiError> {
    let filter = ProjectFilter {
        institution_id: q.institution_id,
        sector: q.sector,
        stage: q.stage,
    };
    Ok(Json(innovation_service::list_projects(&state.db, filter).await?))
}

async fn create_project(
    State(state): State<ServerState>,
    Json(body): Json<ProjectInput>,
) -> Result<(StatusCode, Json<project::Model>), JsonApiError> {
    let created = innovation_service::create_project(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_project(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<project::Model>, JsonApiError> {
    innovation_service::get_project(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("project not found"))
}

async fn update_project(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProjectInput>,
) -> Result<Json<project::Model>, JsonApiError> {
    Ok(Json(innovation_service::update_project(&state.db, id, body).await?))
}

async fn delete_project(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if innovation_service::delete_project(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("project not found"))
    }
}

async fn list_grants(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<Vec<research_grant::Model>>, JsonApiError> {
    Ok(Json(innovation_service::list_grants(&state.db, q.institution_id).await?))
}

async fn create_grant(
    State(state): State<ServerState>,
    Json(body): Json<GrantInput>,
) -> Result<(StatusCode, Json<research_grant::Model>), JsonApiError> {
    let created = innovation_service::create_grant(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_grant(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if innovation_service::delete_grant(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("grant not found"))
    }
}

async fn list_partnerships(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<Vec<partnership::Model>>, JsonApiError> {
    Ok(Json(innovation_service::list_partnerships(&state.db, q.institution_id).await?))
}

async fn create_partnership(
    State(state): State<ServerState>,
    Json(body): Json<PartnershipInput>,
) -> Result<(StatusCode, Json<partnership::Model>), JsonApiError> {
    let created = innovation_service::create_partnership(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_partnership(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if innovation_service::delete_partnership(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("partnership not found"))
    }
}

async fn stats(
    State(state): State<ServerState>,
    Query(q): Query<ScopeQuery>,
) -> Result<Json<PipelineStats>, JsonApiError> {
    Ok(Json(innovation_service::pipeline_stats(&state.db, q.institution_id).await?))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/innovation/hubs", get(list_hubs).post(create_hub))
        .route("/api/innovation/hubs/:id", axum::routing::put(update_hub).delete(delete_hub))
        .route("/api/innovation/projects", get(list_projects).post(create_project))
        .route(
            "/api/innovation/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/innovation/grants", get(list_grants).post(create_grant))
        .route("/api/innovation/grants/:id", axum::routing::delete(delete_grant))
        .route("/api/innovation/partnerships", get(list_partnerships).post(create_partnership))
        .route("/api/innovation/partnerships/:id", axum::routing::delete(delete_partnership))
        .route("/api/innovation/stats", get(stats))
}
