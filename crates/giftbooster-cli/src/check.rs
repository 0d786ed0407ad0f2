use giftbooster_core::{CartSnapshot, LineItem, ShopDomain};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

/// Parse `PRODUCT:VARIANT` (or a bare `PRODUCT`) into a cart line.
///
/// Colons inside a `gid://` scheme are not separators.
pub(crate) fn parse_line_item(raw: &str) -> Result<LineItem, String> {
    let separator = raw
        .match_indices(':')
        .map(|(i, _)| i)
        .find(|&i| !raw[i + 1..].starts_with("//"));
    let (product, variant) = match separator {
        Some(i) => (&raw[..i], &raw[i + 1..]),
        None => (raw, ""),
    };
    let product = Some(product.trim()).filter(|s| !s.is_empty());
    let variant = Some(variant.trim()).filter(|s| !s.is_empty());

    if product.is_none() && variant.is_none() {
        return Err(format!(
            "'{raw}' has neither a product nor a variant id; expected PRODUCT:VARIANT"
        ));
    }
    Ok(LineItem::new(product, variant))
}

/// # Errors
///
/// Returns an error if the tiers cannot be loaded or the total is negative.
pub(crate) async fn run_check(
    pool: &SqlitePool,
    shop: &ShopDomain,
    total: Decimal,
    items: Vec<LineItem>,
) -> anyhow::Result<()> {
    let tiers = giftbooster_db::list_gift_tiers(pool, shop).await?;
    let cart = CartSnapshot {
        cart_total: total,
        line_items: items,
    };
    let result = giftbooster_core::evaluate_cart(&tiers, &cart)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
