//! Store settings loading from config.toml
//!
//! The store's pricing constants, order number prefix, and the catalog and
//! coupon rows to seed on first run all live in one TOML file. Seeds are
//! optional; a config carrying only pricing overrides is valid, and every
//! pricing field falls back to its default when omitted.

use crate::core::pricing::PricingConfig;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Tax, shipping threshold, and flat rate
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Prefix on every order number, e.g. `"MDM"`
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,
    /// Catalog rows to seed when missing
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Coupons to seed when missing
    #[serde(default)]
    pub coupons: Vec<CouponSeed>,
}

fn default_order_prefix() -> String {
    "MDM".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            order_prefix: default_order_prefix(),
            products: Vec::new(),
            coupons: Vec::new(),
        }
    }
}

/// Seed row for one catalog product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Display name, also the dedup key during seeding
    pub name: String,
    /// Product page description
    pub description: String,
    /// Primary image URL
    #[serde(default)]
    pub image_url: String,
    /// Unit price
    pub price: Decimal,
    /// Initial units on the shelf
    pub stock_quantity: i32,
}

/// Seed row for one coupon
#[derive(Debug, Deserialize, Clone)]
pub struct CouponSeed {
    /// Redemption code; stored uppercase
    pub code: String,
    /// Promotion description
    pub description: String,
    /// Discount percentage in [0, 100]
    pub discount_percent: Decimal,
    /// Subtotal below which the coupon grants nothing
    pub minimum_order_amount: Option<Decimal>,
    /// Days from seeding until the coupon expires
    pub valid_days: i64,
    /// Redemption cap across all users
    pub usage_limit: Option<i32>,
    /// Whether redemption requires a confirmed email address
    #[serde(default)]
    pub require_confirmed_email: bool,
}

/// Loads store configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads store configuration from the default location (./config.toml).
pub fn load_default_config() -> Result<StoreConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_store_config() {
        let toml_str = r#"
            order_prefix = "MDM"

            [pricing]
            tax_rate = "0.10"
            free_shipping_threshold = "500"
            flat_shipping_rate = "25"

            [[products]]
            name = "Atlas Tile"
            description = "Hand-cut cement tile"
            image_url = "/img/atlas.jpg"
            price = "39.99"
            stock_quantity = 120

            [[coupons]]
            code = "welcome10"
            description = "10% off your first order"
            discount_percent = "10"
            valid_days = 90
            usage_limit = 1000
            require_confirmed_email = true
        "#;

        let config: StoreConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.order_prefix, "MDM");
        assert_eq!(config.pricing.tax_rate, dec!(0.10));
        assert_eq!(config.products.len(), 1);
        assert_eq!(config.products[0].price, dec!(39.99));
        assert_eq!(config.coupons.len(), 1);
        assert_eq!(config.coupons[0].code, "welcome10");
        assert_eq!(config.coupons[0].minimum_order_amount, None);
        assert!(config.coupons[0].require_confirmed_email);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.order_prefix, "MDM");
        assert_eq!(config.pricing.tax_rate, dec!(0.10));
        assert_eq!(config.pricing.free_shipping_threshold, dec!(500));
        assert_eq!(config.pricing.flat_shipping_rate, dec!(25));
        assert!(config.products.is_empty());
        assert!(config.coupons.is_empty());
    }
}
