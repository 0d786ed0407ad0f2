//! Tier configuration handlers: list and full-replace save.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use giftbooster_core::{GiftTier, GiftTierDraft};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::shop::Shop;
use super::{json_body, map_core_error, map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SaveTiersRequest {
    pub tiers: Vec<GiftTierDraft>,
}

/// GET /api/v1/tiers
pub(super) async fn list_tiers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Shop(shop): Shop,
) -> Result<Json<ApiResponse<Vec<GiftTier>>>, ApiError> {
    let tiers = giftbooster_db::list_gift_tiers(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, tiers)))
}

/// POST|PUT /api/v1/tiers: validate, then replace the shop's whole tier set.
pub(super) async fn save_tiers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Shop(shop): Shop,
    body: Result<Json<SaveTiersRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<GiftTier>>>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, body)?;

    let drafts = giftbooster_core::validate_tier_set(body.tiers).map_err(|e| {
        tracing::info!(shop = %shop, error = %e, "rejected tier set");
        map_core_error(rid, &e)
    })?;

    let saved = giftbooster_db::replace_gift_tiers(&state.pool, &shop, &drafts)
        .await
        .map_err(|e| map_replace_error(rid, &e))?;

    tracing::info!(shop = %shop, tiers = saved.len(), "saved gift tiers");
    Ok(Json(ApiResponse::new(req_id.0, saved)))
}

fn map_replace_error(req_id: &str, e: &giftbooster_db::DbError) -> ApiError {
    if let giftbooster_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.is_unique_violation() {
            return ApiError::new(req_id, "conflict", "tier id is not available");
        }
    }
    map_db_error(req_id.to_owned(), e)
}
