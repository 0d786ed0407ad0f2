//! Shop domain parsing. Every persisted row is partitioned by this key.

use serde::{Deserialize, Serialize};

use crate::CoreError;

const SHOP_SUFFIX: &str = ".myshopify.com";

/// A validated `<handle>.myshopify.com` domain, always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Parse and normalize a raw shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidShopDomain`] if the value is not a
    /// `*.myshopify.com` domain with a non-empty alphanumeric/hyphen handle.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.trim().to_ascii_lowercase();
        let handle = normalized
            .strip_suffix(SHOP_SUFFIX)
            .ok_or_else(|| CoreError::InvalidShopDomain(raw.to_string()))?;

        let valid_handle = !handle.is_empty()
            && !handle.starts_with('-')
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid_handle {
            return Err(CoreError::InvalidShopDomain(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopDomain> for String {
    fn from(value: ShopDomain) -> Self {
        value.0
    }
}
