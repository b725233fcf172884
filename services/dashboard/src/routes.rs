use crate::infra::{load_table_off_runtime, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Local};
use expedientes::cases::{CaseImporter, CaseRecord, CaseTable, DashboardSummary, TopicSummary};
use expedientes::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryUploadRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) include_records: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryResponse {
    pub(crate) source: SummarySource,
    pub(crate) loaded_at: DateTime<Local>,
    pub(crate) record_count: usize,
    pub(crate) summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) records: Option<Vec<CaseRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SummarySource {
    Configured,
    Upload,
}

impl SummaryResponse {
    fn build(source: SummarySource, table: CaseTable, include_records: bool) -> Self {
        let summary = table.summarizer().dashboard();
        Self {
            source,
            loaded_at: Local::now(),
            record_count: table.len(),
            summary,
            records: include_records.then(|| table.records().to_vec()),
        }
    }
}

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/summary",
            get(configured_summary_endpoint).post(upload_summary_endpoint),
        )
        .route("/api/v1/summary/topics", get(configured_topics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Re-reads the configured export so every request reflects the file on disk.
pub(crate) async fn configured_summary_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let table = load_table_off_runtime(state.dataset.clone()).await?;
    Ok(Json(SummaryResponse::build(
        SummarySource::Configured,
        table,
        false,
    )))
}

pub(crate) async fn upload_summary_endpoint(
    Json(payload): Json<SummaryUploadRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let SummaryUploadRequest {
        csv,
        include_records,
    } = payload;

    let table = tokio::task::spawn_blocking(move || {
        CaseImporter::from_csv_reader(Cursor::new(csv.into_bytes()))
    })
    .await
    .map_err(|err| AppError::Io(std::io::Error::other(err)))??;
    Ok(Json(SummaryResponse::build(
        SummarySource::Upload,
        table,
        include_records,
    )))
}

/// Topic views only; a source without a `TEMA` column is a 422 here rather
/// than a degraded section.
pub(crate) async fn configured_topics_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<TopicSummary>, AppError> {
    let table = load_table_off_runtime(state.dataset.clone()).await?;
    let summarizer = table.summarizer();
    let breakdown = summarizer.topic_status_breakdown()?;
    let totals = summarizer.topic_totals()?;
    Ok(Json(TopicSummary { breakdown, totals }))
}
