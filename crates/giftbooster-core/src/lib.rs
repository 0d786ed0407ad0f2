pub mod analytics;
pub mod app_config;
pub mod cart;
pub mod config;
pub mod qualification;
pub mod shop;
pub mod tiers;

pub use analytics::{normalize_period_days, AnalyticsSummary, NewAnalyticsEvent};
pub use app_config::{AppConfig, Environment};
pub use cart::{CartSnapshot, LineItem};
pub use config::{load_app_config, load_app_config_from_env};
pub use qualification::{evaluate_cart, NextTier, QualificationResult, QualifyingTier};
pub use shop::ShopDomain;
pub use tiers::{load_tier_file, validate_tier_set, GiftTier, GiftTierDraft, TierFile};

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Input errors raised by the domain layer. None of these are retryable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("cart total must not be negative, got {0}")]
    NegativeCartTotal(Decimal),
    #[error("threshold amount must be greater than zero, got {0}")]
    NonPositiveThreshold(Decimal),
    #[error("active tier at threshold {0} requires both a gift product id and a gift variant id")]
    MissingGiftIdentifiers(Decimal),
    #[error("each tier must have a unique threshold amount; {0} appears more than once")]
    DuplicateThreshold(Decimal),
    #[error("tier id {0} appears more than once")]
    DuplicateTierId(Uuid),
    #[error("analytics cart total must not be negative, got {0}")]
    NegativeAnalyticsTotal(Decimal),
    #[error("invalid shop domain '{0}'; expected <shop>.myshopify.com")]
    InvalidShopDomain(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read tier file {path}: {source}")]
    TierFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tier file: {0}")]
    TierFileParse(#[from] serde_yaml::Error),
    #[error("invalid tier file: {0}")]
    InvalidTiers(#[from] CoreError),
}
