use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use giftbooster_core::{CartSnapshot, QualificationResult};

use crate::middleware::RequestId;

use super::shop::Shop;
use super::{json_body, map_core_error, map_db_error, ApiError, ApiResponse, AppState};

/// POST /api/v1/cart/check: evaluate a cart snapshot against the shop's tiers.
pub(super) async fn check_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Shop(shop): Shop,
    body: Result<Json<CartSnapshot>, JsonRejection>,
) -> Result<Json<ApiResponse<QualificationResult>>, ApiError> {
    let rid = &req_id.0;
    let cart = json_body(rid, body)?;

    let tiers = giftbooster_db::list_gift_tiers(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let result =
        giftbooster_core::evaluate_cart(&tiers, &cart).map_err(|e| map_core_error(rid, &e))?;

    tracing::debug!(
        shop = %shop,
        cart_total = %cart.cart_total,
        qualifying = result.qualifying_tiers.len(),
        pending = result.pending_gifts().count(),
        "evaluated cart"
    );
    Ok(Json(ApiResponse::new(req_id.0, result)))
}
