//! Database operations for the `gift_tiers` table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use giftbooster_core::{GiftTier, GiftTierDraft, ShopDomain};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{parse_decimal, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `gift_tiers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GiftTierRow {
    pub id: Uuid,
    pub shop_domain: String,
    /// Decimal stored as TEXT, e.g. `"49.99"`.
    pub threshold_amount: String,
    pub gift_product_id: Option<String>,
    pub gift_variant_id: Option<String>,
    pub gift_description: String,
    pub is_active: bool,
    pub tier_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GiftTierRow> for GiftTier {
    type Error = DbError;

    fn try_from(row: GiftTierRow) -> Result<Self, Self::Error> {
        Ok(GiftTier {
            id: row.id,
            shop_domain: row.shop_domain,
            threshold_amount: parse_decimal(&row.threshold_amount)?,
            gift_product_id: row.gift_product_id,
            gift_variant_id: row.gift_variant_id,
            gift_description: row.gift_description,
            is_active: row.is_active,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all tiers for a shop in their saved (ascending threshold) order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidDecimal`]
/// if a stored threshold cannot be parsed.
pub async fn list_gift_tiers(
    pool: &SqlitePool,
    shop: &ShopDomain,
) -> Result<Vec<GiftTier>, DbError> {
    list_gift_tier_rows(pool, shop)
        .await?
        .into_iter()
        .map(GiftTier::try_from)
        .collect()
}

/// Replaces a shop's entire tier set with `tiers`.
///
/// `tiers` must already have passed `giftbooster_core::validate_tier_set`, so
/// it is sorted ascending by threshold; each tier's position becomes its
/// `tier_order`. Drafts that carry an existing id keep it along with their
/// original `created_at`. Delete and inserts share one transaction, so a
/// failure leaves the previous set in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails, including a primary-key
/// collision with a tier id owned by another shop.
pub async fn replace_gift_tiers(
    pool: &SqlitePool,
    shop: &ShopDomain,
    tiers: &[GiftTierDraft],
) -> Result<Vec<GiftTier>, DbError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let existing: HashMap<Uuid, DateTime<Utc>> = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
        "SELECT id, created_at FROM gift_tiers WHERE shop_domain = ?1",
    )
    .bind(shop.as_str())
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .collect();

    sqlx::query("DELETE FROM gift_tiers WHERE shop_domain = ?1")
        .bind(shop.as_str())
        .execute(&mut *tx)
        .await?;

    let mut saved = Vec::with_capacity(tiers.len());
    for (index, draft) in tiers.iter().enumerate() {
        let tier = GiftTier::from_draft(shop, draft.clone());
        let created_at = existing.get(&tier.id).copied().unwrap_or(now);
        let tier_order = i64::try_from(index).unwrap_or(i64::MAX);

        sqlx::query(
            "INSERT INTO gift_tiers \
                 (id, shop_domain, threshold_amount, gift_product_id, gift_variant_id, \
                  gift_description, is_active, tier_order, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(tier.id)
        .bind(&tier.shop_domain)
        .bind(tier.threshold_amount.to_string())
        .bind(&tier.gift_product_id)
        .bind(&tier.gift_variant_id)
        .bind(&tier.gift_description)
        .bind(tier.is_active)
        .bind(tier_order)
        .bind(created_at)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        saved.push(tier);
    }

    tx.commit().await?;
    Ok(saved)
}

/// Returns the raw rows for a shop, including bookkeeping columns.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_gift_tier_rows(
    pool: &SqlitePool,
    shop: &ShopDomain,
) -> Result<Vec<GiftTierRow>, DbError> {
    let rows = sqlx::query_as::<_, GiftTierRow>(
        "SELECT id, shop_domain, threshold_amount, gift_product_id, gift_variant_id, \
                gift_description, is_active, tier_order, created_at, updated_at \
         FROM gift_tiers \
         WHERE shop_domain = ?1 \
         ORDER BY tier_order",
    )
    .bind(shop.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
