use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One line of the shopper's cart. Only the identifiers matter for gift
/// matching; Shopify's cart JSON sends them as numbers, the admin as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub variant_id: Option<String>,
}

impl LineItem {
    #[must_use]
    pub fn new(product_id: Option<&str>, variant_id: Option<&str>) -> Self {
        Self {
            product_id: product_id.map(str::to_owned),
            variant_id: variant_id.map(str::to_owned),
        }
    }
}

/// The cart state the storefront sends for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_total: Decimal,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// Reduce a Shopify GID (`gid://shopify/ProductVariant/123`) to its trailing
/// legacy id so GIDs and bare numeric ids compare equal.
#[must_use]
pub fn legacy_id(id: &str) -> &str {
    let trimmed = id.trim();
    if trimmed.starts_with("gid://") {
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    } else {
        trimmed
    }
}

/// `true` when both ids are present, non-blank, and name the same resource.
#[must_use]
pub fn ids_match(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(legacy_id), b.map(legacy_id)) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_id_strips_gid_prefix() {
        assert_eq!(legacy_id("gid://shopify/ProductVariant/4455"), "4455");
        assert_eq!(legacy_id("4455"), "4455");
        assert_eq!(legacy_id(" 12 "), "12");
    }

    #[test]
    fn ids_match_requires_both_sides() {
        assert!(ids_match(Some("gid://shopify/Product/9"), Some("9")));
        assert!(!ids_match(None, Some("9")));
        assert!(!ids_match(None, None));
        assert!(!ids_match(Some(""), Some("")));
        assert!(!ids_match(Some("9"), Some("10")));
    }

    #[test]
    fn line_item_accepts_numeric_and_string_ids() {
        let item: LineItem =
            serde_json::from_str(r#"{"product_id": 123, "variant_id": "gid://shopify/ProductVariant/7"}"#)
                .unwrap();
        assert_eq!(item.product_id.as_deref(), Some("123"));
        assert_eq!(item.variant_id.as_deref(), Some("gid://shopify/ProductVariant/7"));
    }

    #[test]
    fn line_item_tolerates_missing_and_null_ids() {
        let item: LineItem = serde_json::from_str(r#"{"variant_id": null, "quantity": 2}"#).unwrap();
        assert_eq!(item, LineItem::default());
    }

    #[test]
    fn cart_snapshot_rejects_non_array_line_items() {
        let result =
            serde_json::from_str::<CartSnapshot>(r#"{"cart_total": 10, "line_items": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn cart_snapshot_defaults_line_items() {
        let cart: CartSnapshot = serde_json::from_str(r#"{"cart_total": "42.50"}"#).unwrap();
        assert!(cart.line_items.is_empty());
        assert_eq!(cart.cart_total.to_string(), "42.50");
    }
}
