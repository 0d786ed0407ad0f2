//! Multi-tier gift qualification.
//!
//! Every active tier whose threshold the cart meets applies at once: a cart
//! at 120 with tiers at 50 and 100 earns both gifts, not just the larger one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{ids_match, CartSnapshot, LineItem};
use crate::{CoreError, GiftTier};

pub const NOT_CONFIGURED_MESSAGE: &str = "no gift tiers configured";

/// A tier the cart has earned, and whether its gift is already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifyingTier {
    #[serde(flatten)]
    pub tier: GiftTier,
    pub already_in_cart: bool,
}

/// The cheapest tier still out of reach, reported only when nothing qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTier {
    pub tier_id: Uuid,
    pub threshold_amount: Decimal,
    pub gift_description: String,
    pub amount_needed: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub qualifies: bool,
    /// `false` when the shop has no active tiers at all.
    pub configured: bool,
    pub qualifying_tiers: Vec<QualifyingTier>,
    pub gifts_in_cart_count: usize,
    pub next_tier: Option<NextTier>,
    pub message: Option<String>,
}

impl QualificationResult {
    /// Qualifying tiers whose gift still has to be added to the cart.
    pub fn pending_gifts(&self) -> impl Iterator<Item = &GiftTier> {
        self.qualifying_tiers
            .iter()
            .filter(|q| !q.already_in_cart)
            .map(|q| &q.tier)
    }
}

/// Evaluate `cart` against a shop's tiers.
///
/// Inactive tiers are ignored. Tiers are considered in ascending threshold
/// order regardless of the order they are passed in.
///
/// # Errors
///
/// Returns [`CoreError::NegativeCartTotal`] if the cart total is below zero.
pub fn evaluate_cart(
    tiers: &[GiftTier],
    cart: &CartSnapshot,
) -> Result<QualificationResult, CoreError> {
    if cart.cart_total < Decimal::ZERO {
        return Err(CoreError::NegativeCartTotal(cart.cart_total));
    }

    let mut active: Vec<&GiftTier> = tiers.iter().filter(|t| t.is_active).collect();
    active.sort_by(|a, b| a.threshold_amount.cmp(&b.threshold_amount));

    if active.is_empty() {
        return Ok(QualificationResult {
            qualifies: false,
            configured: false,
            qualifying_tiers: Vec::new(),
            gifts_in_cart_count: 0,
            next_tier: None,
            message: Some(NOT_CONFIGURED_MESSAGE.to_string()),
        });
    }

    let qualifying_tiers: Vec<QualifyingTier> = active
        .iter()
        .filter(|t| t.threshold_amount <= cart.cart_total)
        .map(|t| QualifyingTier {
            tier: (*t).clone(),
            already_in_cart: gift_in_cart(t, &cart.line_items),
        })
        .collect();

    let gifts_in_cart_count = qualifying_tiers.iter().filter(|q| q.already_in_cart).count();

    let next_tier = if qualifying_tiers.is_empty() {
        active
            .iter()
            .find(|t| t.threshold_amount > cart.cart_total)
            .map(|t| NextTier {
                tier_id: t.id,
                threshold_amount: t.threshold_amount,
                gift_description: t.gift_description.clone(),
                amount_needed: t.threshold_amount - cart.cart_total,
            })
    } else {
        None
    };

    Ok(QualificationResult {
        qualifies: !qualifying_tiers.is_empty(),
        configured: true,
        qualifying_tiers,
        gifts_in_cart_count,
        next_tier,
        message: None,
    })
}

fn gift_in_cart(tier: &GiftTier, line_items: &[LineItem]) -> bool {
    line_items.iter().any(|item| {
        ids_match(item.product_id.as_deref(), tier.gift_product_id.as_deref())
            || ids_match(item.variant_id.as_deref(), tier.gift_variant_id.as_deref())
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tier(threshold: &str, gift: &str, active: bool) -> GiftTier {
        GiftTier {
            id: Uuid::new_v4(),
            shop_domain: "demo-store.myshopify.com".to_string(),
            threshold_amount: dec(threshold),
            gift_product_id: Some(format!("prod-{gift}")),
            gift_variant_id: Some(format!("var-{gift}")),
            gift_description: format!("Gift {gift}"),
            is_active: active,
        }
    }

    fn cart(total: &str, items: Vec<LineItem>) -> CartSnapshot {
        CartSnapshot {
            cart_total: dec(total),
            line_items: items,
        }
    }

    fn thresholds(result: &QualificationResult) -> Vec<Decimal> {
        result
            .qualifying_tiers
            .iter()
            .map(|q| q.tier.threshold_amount)
            .collect()
    }

    #[test]
    fn cart_above_every_threshold_earns_all_gifts() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let result = evaluate_cart(&tiers, &cart("120", vec![])).unwrap();

        assert!(result.qualifies);
        assert!(result.configured);
        assert_eq!(thresholds(&result), vec![dec("50"), dec("100")]);
        assert!(result.qualifying_tiers.iter().all(|q| !q.already_in_cart));
        assert_eq!(result.gifts_in_cart_count, 0);
        assert!(result.next_tier.is_none());
    }

    #[test]
    fn cart_between_thresholds_earns_lower_tier_only() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let result = evaluate_cart(&tiers, &cart("70", vec![])).unwrap();

        assert!(result.qualifies);
        assert_eq!(thresholds(&result), vec![dec("50")]);
        assert!(result.next_tier.is_none());
    }

    #[test]
    fn cart_below_every_threshold_reports_next_tier() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let result = evaluate_cart(&tiers, &cart("30", vec![])).unwrap();

        assert!(!result.qualifies);
        assert!(result.qualifying_tiers.is_empty());
        let next = result.next_tier.expect("next tier");
        assert_eq!(next.threshold_amount, dec("50"));
        assert_eq!(next.amount_needed, dec("20"));
        assert_eq!(next.tier_id, tiers[0].id);
    }

    #[test]
    fn threshold_is_inclusive() {
        let tiers = vec![tier("50", "A", true)];
        let result = evaluate_cart(&tiers, &cart("50.00", vec![])).unwrap();
        assert!(result.qualifies);
    }

    #[test]
    fn inactive_tiers_never_qualify_or_become_next() {
        let tiers = vec![tier("20", "A", false), tier("60", "B", true)];

        let rich = evaluate_cart(&tiers, &cart("100", vec![])).unwrap();
        assert_eq!(thresholds(&rich), vec![dec("60")]);

        let poor = evaluate_cart(&tiers, &cart("10", vec![])).unwrap();
        assert_eq!(
            poor.next_tier.map(|n| n.threshold_amount),
            Some(dec("60"))
        );
    }

    #[test]
    fn unsorted_input_is_evaluated_ascending() {
        let tiers = vec![tier("100", "B", true), tier("25", "Z", true), tier("50", "A", true)];

        let result = evaluate_cart(&tiers, &cart("75", vec![])).unwrap();
        assert_eq!(thresholds(&result), vec![dec("25"), dec("50")]);

        let below = evaluate_cart(&tiers, &cart("5", vec![])).unwrap();
        assert_eq!(below.next_tier.unwrap().threshold_amount, dec("25"));
    }

    #[test]
    fn no_tiers_is_not_configured() {
        let result = evaluate_cart(&[], &cart("500", vec![])).unwrap();
        assert!(!result.qualifies);
        assert!(!result.configured);
        assert!(result.next_tier.is_none());
        assert_eq!(result.message.as_deref(), Some(NOT_CONFIGURED_MESSAGE));
    }

    #[test]
    fn only_inactive_tiers_is_not_configured() {
        let result = evaluate_cart(&[tier("10", "A", false)], &cart("500", vec![])).unwrap();
        assert!(!result.configured);
    }

    #[test]
    fn negative_total_is_rejected() {
        let err = evaluate_cart(&[tier("10", "A", true)], &cart("-0.01", vec![])).unwrap_err();
        assert_eq!(err, CoreError::NegativeCartTotal(dec("-0.01")));
    }

    #[test]
    fn gift_matches_on_product_or_variant() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let items = vec![
            LineItem::new(Some("prod-A"), Some("something-else")),
            LineItem::new(None, Some("var-B")),
        ];
        let result = evaluate_cart(&tiers, &cart("150", items)).unwrap();

        assert!(result.qualifying_tiers.iter().all(|q| q.already_in_cart));
        assert_eq!(result.gifts_in_cart_count, 2);
        assert_eq!(result.pending_gifts().count(), 0);
    }

    #[test]
    fn gid_identifiers_match_numeric_cart_ids() {
        let mut t = tier("40", "A", true);
        t.gift_product_id = Some("gid://shopify/Product/111".to_string());
        t.gift_variant_id = Some("gid://shopify/ProductVariant/222".to_string());
        let items = vec![LineItem::new(Some("999"), Some("222"))];

        let result = evaluate_cart(&[t], &cart("45", items)).unwrap();
        assert!(result.qualifying_tiers[0].already_in_cart);
    }

    #[test]
    fn gift_in_cart_for_unearned_tier_is_not_counted() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let items = vec![LineItem::new(Some("prod-B"), Some("var-B"))];
        let result = evaluate_cart(&tiers, &cart("60", items)).unwrap();

        assert_eq!(result.gifts_in_cart_count, 0);
        let pending: Vec<_> = result.pending_gifts().map(|t| t.threshold_amount).collect();
        assert_eq!(pending, vec![dec("50")]);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let tiers = vec![tier("50", "A", true), tier("100", "B", true)];
        let c = cart("75", vec![LineItem::new(Some("prod-A"), None)]);
        let first = evaluate_cart(&tiers, &c).unwrap();
        let second = evaluate_cart(&tiers, &c).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn qualifying_set_matches_threshold_filter_exactly() {
        let tiers = vec![
            tier("10", "A", true),
            tier("20", "B", false),
            tier("30", "C", true),
            tier("40", "D", true),
            tier("55.5", "E", true),
        ];
        for total in ["0", "9.99", "10", "29.99", "30", "40", "55.49", "55.5", "1000"] {
            let total = dec(total);
            let result = evaluate_cart(&tiers, &cart(&total.to_string(), vec![])).unwrap();
            let expected: Vec<Decimal> = tiers
                .iter()
                .filter(|t| t.is_active && t.threshold_amount <= total)
                .map(|t| t.threshold_amount)
                .collect();
            assert_eq!(thresholds(&result), expected, "total {total}");
            assert_eq!(result.qualifies, !expected.is_empty());
        }
    }

    #[test]
    fn result_serializes_flattened_tier_fields() {
        let tiers = vec![tier("50", "A", true)];
        let result = evaluate_cart(&tiers, &cart("50", vec![])).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["qualifying_tiers"][0]["gift_product_id"], "prod-A");
        assert_eq!(json["qualifying_tiers"][0]["already_in_cart"], false);
        assert!(json["next_tier"].is_null());
    }
}
