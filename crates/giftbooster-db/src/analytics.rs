use chrono::{DateTime, Duration, Utc};
use giftbooster_core::{AnalyticsSummary, NewAnalyticsEvent, ShopDomain};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::{parse_decimal, DbError};

/// Record one storefront trigger and return its row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analytics_event(
    pool: &SqlitePool,
    shop: &ShopDomain,
    event: &NewAnalyticsEvent,
) -> Result<i64, DbError> {
    insert_analytics_event_at(pool, shop, event, Utc::now()).await
}

/// Same as [`insert_analytics_event`] with an explicit timestamp.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analytics_event_at(
    pool: &SqlitePool,
    shop: &ShopDomain,
    event: &NewAnalyticsEvent,
    created_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO gift_analytics \
             (shop_domain, order_id, cart_total, gift_tier_id, gift_added, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         RETURNING id",
    )
    .bind(shop.as_str())
    .bind(&event.order_id)
    .bind(event.cart_total.to_string())
    .bind(event.gift_tier_id)
    .bind(event.gift_added)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetch `(cart_total, gift_added)` for every event of `shop` recorded at or
/// after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidDecimal`]
/// if a stored cart total cannot be parsed.
pub async fn list_analytics_totals_since(
    pool: &SqlitePool,
    shop: &ShopDomain,
    since: DateTime<Utc>,
) -> Result<Vec<(Decimal, bool)>, DbError> {
    let rows = sqlx::query_as::<_, (String, bool)>(
        "SELECT cart_total, gift_added \
         FROM gift_analytics \
         WHERE shop_domain = ?1 AND created_at >= ?2 \
         ORDER BY created_at",
    )
    .bind(shop.as_str())
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(total, added)| Ok((parse_decimal(&total)?, added)))
        .collect()
}

/// Summarize the last `days` days of events for `shop`.
///
/// `days` should already be normalized with
/// `giftbooster_core::normalize_period_days`.
///
/// # Errors
///
/// Returns [`DbError`] if the underlying query fails.
pub async fn summarize_analytics(
    pool: &SqlitePool,
    shop: &ShopDomain,
    days: i64,
) -> Result<AnalyticsSummary, DbError> {
    let since = Utc::now() - Duration::days(days);
    let events = list_analytics_totals_since(pool, shop, since).await?;
    Ok(AnalyticsSummary::from_events(days, events))
}

/// Delete every event (across all shops) recorded before `cutoff`.
///
/// Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn prune_analytics_before(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM gift_analytics WHERE created_at < ?1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
