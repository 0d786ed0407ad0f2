//! Per-request shop scoping.

use axum::{extract::FromRequestParts, http::request::Parts};
use giftbooster_core::ShopDomain;

use crate::middleware::RequestId;

use super::{map_core_error, ApiError};

pub(super) const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// The shop a request acts on, taken from the `X-Shopify-Shop-Domain` header.
#[derive(Debug, Clone)]
pub(super) struct Shop(pub ShopDomain);

impl<S> FromRequestParts<S> for Shop
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let req_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();

        let raw = parts
            .headers
            .get(SHOP_DOMAIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::new(&req_id, "bad_request", "shop domain required"))?;

        ShopDomain::parse(raw)
            .map(Shop)
            .map_err(|e| map_core_error(&req_id, &e))
    }
}
