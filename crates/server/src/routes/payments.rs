use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use service::payment_service::{
    self, FinanceSummary, PaymentInput, PaymentReceipt, RecentPayment,
};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

async fn record(
    State(state): State<ServerState>,
    Json(body): Json<PaymentInput>,
) -> Result<(StatusCode, Json<PaymentReceipt>), JsonApiError> {
    let receipt = payment_service::record_payment(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    institution_id: Option<Uuid>,
    limit: Option<u64>,
}

async fn recent(
    State(state): State<ServerState>,
    Query(q): Query<RecentQuery>,
) -> Result<Json<Vec<RecentPayment>>, JsonApiError> {
    let limit = q.limit.unwrap_or(10).min(100);
    Ok(Json(payment_service::recent_activity(&state.db, q.institution_id, limit).await?))
}

#[derive(Debug, Deserialize)]
struct FinanceQuery {
    institution_id: Option<Uuid>,
}

async fn finance(
    State(state): State<ServerState>,
    Query(q): Query<FinanceQuery>,
) -> Result<Json<FinanceSummary>, JsonApiError> {
    Ok(Json(payment_service::finance_summary(&state.db, q.institution_id).await?))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/payments/record", post(record))
        .route("/api/payments/recent", get(recent))
        .route("/api/payments/finance", get(finance))
}
