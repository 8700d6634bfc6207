use crate::dto::{AnalyticsQueryParams, ItemsQuery, SaveTransactionReq};
use crate::{error::AppError, AppState};
use analytics::Analytics;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use core_types::Transaction;
use std::sync::Arc;

fn read_body(body: Result<Json<SaveTransactionReq>, JsonRejection>) -> Result<SaveTransactionReq, AppError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Invalid JSON body.");
        AppError::BadRequest(rejection.body_text())
    })?;
    Ok(req)
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
}

/// # POST /api/items
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SaveTransactionReq>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    let draft = read_body(body)?.into_draft()?;
    let tr = state.transactions.create(draft).await?;
    Ok(Json(tr))
}

/// # GET /api/items
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let filter = query.into_filter()?;
    let transactions = state.transactions.list(&filter).await?;
    Ok(Json(transactions))
}

/// # GET /api/items/export
/// The same listing as `GET /api/items`, as a CSV download.
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    let body = state.transactions.export_csv(&filter).await?;
    Ok(csv_attachment("transactions.csv", body))
}

/// # GET /api/items/:id
pub async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Transaction>, AppError> {
    let tr = state.transactions.get(&id).await?;
    Ok(Json(tr))
}

/// # PUT /api/items/:id
pub async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<SaveTransactionReq>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    let draft = read_body(body)?.into_draft()?;
    let tr = state.transactions.update(&id, draft).await?;
    Ok(Json(tr))
}

/// # DELETE /api/items/:id
pub async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.transactions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQueryParams>,
) -> Result<Json<Analytics>, AppError> {
    let (from, to, params) = query.into_parts()?;
    let report = state.analytics.get_analytics(from, to, &params).await?;
    Ok(Json(report))
}

/// # GET /api/analytics/export
pub async fn export_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    let (from, to, params) = query.into_parts()?;
    let body = state.analytics.export_csv(from, to, &params).await?;
    Ok(csv_attachment("analytics.csv", body))
}
