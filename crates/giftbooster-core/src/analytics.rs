use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

const DEFAULT_PERIOD_DAYS: i64 = 30;
const MAX_PERIOD_DAYS: i64 = 365;

/// One storefront gift trigger, as reported by the storefront script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnalyticsEvent {
    #[serde(default)]
    pub order_id: Option<String>,
    pub cart_total: Decimal,
    #[serde(default)]
    pub gift_added: bool,
    #[serde(default)]
    pub gift_tier_id: Option<Uuid>,
}

impl NewAnalyticsEvent {
    /// # Errors
    ///
    /// Returns [`CoreError::NegativeAnalyticsTotal`] for a cart total below zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cart_total < Decimal::ZERO {
            return Err(CoreError::NegativeAnalyticsTotal(self.cart_total));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub period_days: i64,
    pub total_triggers: i64,
    pub gifts_added: i64,
    /// Mean cart total over the period, two decimal places.
    pub avg_cart_value: Decimal,
    /// Percentage of triggers that added a gift, one decimal place.
    pub conversion_rate: Decimal,
}

impl AnalyticsSummary {
    /// Aggregate `(cart_total, gift_added)` pairs for one reporting period.
    pub fn from_events<I>(period_days: i64, events: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, bool)>,
    {
        let mut total_triggers: i64 = 0;
        let mut gifts_added: i64 = 0;
        let mut cart_sum = Decimal::ZERO;

        for (cart_total, added) in events {
            total_triggers += 1;
            if added {
                gifts_added += 1;
            }
            cart_sum += cart_total;
        }

        let (avg_cart_value, conversion_rate) = if total_triggers == 0 {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let count = Decimal::from(total_triggers);
            (
                cart_sum / count,
                Decimal::from(gifts_added) * Decimal::ONE_HUNDRED / count,
            )
        };

        Self {
            period_days,
            total_triggers,
            gifts_added,
            avg_cart_value: fixed_dp(avg_cart_value, 2),
            conversion_rate: fixed_dp(conversion_rate, 1),
        }
    }
}

/// Round half away from zero and pin the scale, so `60` renders as `60.00`.
fn fixed_dp(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Clamp a requested reporting window to `1..=365` days, defaulting to 30.
#[must_use]
pub fn normalize_period_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_PERIOD_DAYS).clamp(1, MAX_PERIOD_DAYS)
}
