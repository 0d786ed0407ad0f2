//! Gift tiers: the merchant-configured threshold → free gift rules, plus the
//! save-time validation that keeps a shop's tier set consistent.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ConfigError, CoreError, ShopDomain};

/// A persisted gift tier belonging to one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftTier {
    pub id: Uuid,
    pub shop_domain: String,
    /// Minimum cart subtotal that unlocks this tier's gift.
    pub threshold_amount: Decimal,
    pub gift_product_id: Option<String>,
    pub gift_variant_id: Option<String>,
    pub gift_description: String,
    pub is_active: bool,
}

impl GiftTier {
    /// Materialize a validated draft for `shop`, keeping the draft's id when
    /// it has one so ids stay stable across full-replace saves.
    #[must_use]
    pub fn from_draft(shop: &ShopDomain, draft: GiftTierDraft) -> Self {
        Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            shop_domain: shop.as_str().to_owned(),
            threshold_amount: draft.threshold_amount,
            gift_product_id: draft.gift_product_id,
            gift_variant_id: draft.gift_variant_id,
            gift_description: draft.gift_description,
            is_active: draft.is_active,
        }
    }
}

/// A tier as submitted by the merchant, before it is assigned to a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftTierDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub threshold_amount: Decimal,
    #[serde(default)]
    pub gift_product_id: Option<String>,
    #[serde(default)]
    pub gift_variant_id: Option<String>,
    #[serde(default)]
    pub gift_description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl GiftTierDraft {
    fn normalized(mut self) -> Self {
        self.gift_product_id = non_blank(self.gift_product_id);
        self.gift_variant_id = non_blank(self.gift_variant_id);
        self.gift_description = self.gift_description.trim().to_owned();
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Validate a merchant's edited tier list and return it sorted ascending by
/// threshold, ready to replace the shop's persisted set.
///
/// Blank gift identifiers are treated as missing.
///
/// # Errors
///
/// Returns a [`CoreError`] for a non-positive threshold, an active tier
/// without both gift identifiers, a repeated threshold, or a repeated id.
pub fn validate_tier_set(drafts: Vec<GiftTierDraft>) -> Result<Vec<GiftTierDraft>, CoreError> {
    let mut tiers: Vec<GiftTierDraft> = drafts.into_iter().map(GiftTierDraft::normalized).collect();

    for tier in &tiers {
        if tier.threshold_amount <= Decimal::ZERO {
            return Err(CoreError::NonPositiveThreshold(tier.threshold_amount));
        }
        if tier.is_active && (tier.gift_product_id.is_none() || tier.gift_variant_id.is_none()) {
            return Err(CoreError::MissingGiftIdentifiers(tier.threshold_amount));
        }
    }

    // `normalize` folds 50 and 50.00 onto the same key.
    let mut seen_thresholds = HashSet::new();
    for tier in &tiers {
        if !seen_thresholds.insert(tier.threshold_amount.normalize()) {
            return Err(CoreError::DuplicateThreshold(tier.threshold_amount));
        }
    }

    let mut seen_ids = HashSet::new();
    for id in tiers.iter().filter_map(|t| t.id) {
        if !seen_ids.insert(id) {
            return Err(CoreError::DuplicateTierId(id));
        }
    }

    tiers.sort_by(|a, b| a.threshold_amount.cmp(&b.threshold_amount));
    Ok(tiers)
}

#[derive(Debug, Deserialize)]
pub struct TierFile {
    pub tiers: Vec<GiftTierDraft>,
}

/// Load a YAML tier file and validate its contents.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_tier_file(path: &Path) -> Result<Vec<GiftTierDraft>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TierFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: TierFile = serde_yaml::from_str(&content)?;
    Ok(validate_tier_set(file.tiers)?)
}

#[cfg(test)]
#[path = "tiers_test.rs"]
mod tests;
