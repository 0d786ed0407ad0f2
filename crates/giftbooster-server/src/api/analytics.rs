use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use giftbooster_core::{AnalyticsSummary, NewAnalyticsEvent};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::shop::Shop;
use super::{json_body, map_core_error, map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SummaryParams {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordedEvent {
    pub id: i64,
}

/// POST /api/v1/analytics/events
pub(super) async fn record_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Shop(shop): Shop,
    body: Result<Json<NewAnalyticsEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RecordedEvent>>), ApiError> {
    let rid = &req_id.0;
    let event = json_body(rid, body)?;
    event.validate().map_err(|e| map_core_error(rid, &e))?;

    let id = giftbooster_db::insert_analytics_event(&state.pool, &shop, &event)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, RecordedEvent { id })),
    ))
}

/// GET /api/v1/analytics/summary?days=N
pub(super) async fn summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Shop(shop): Shop,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, ApiError> {
    let rid = &req_id.0;
    let Query(params) =
        params.map_err(|e| ApiError::new(rid, "validation_error", e.body_text()))?;
    let days = giftbooster_core::normalize_period_days(params.days);

    let summary = giftbooster_db::summarize_analytics(&state.pool, &shop, days)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, summary)))
}
