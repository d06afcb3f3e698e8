//! Pricing calculator - Pure quoting of subtotal, tax, and shipping.
//!
//! No database access and no side effects: a quote is a function of the cart
//! lines and the store's pricing configuration. All rounding in the crate
//! goes through [`round_money`] so every monetary figure carries the same
//! two-digit, banker's-rounding rule.

use crate::entities::cart_item;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Store pricing settings, loadable from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Tax rate applied to the subtotal, e.g. `0.10` for 10%
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    /// Subtotal at or above which shipping is free
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,
    /// Flat shipping rate charged below the threshold
    #[serde(default = "default_flat_shipping_rate")]
    pub flat_shipping_rate: Decimal,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_free_shipping_threshold() -> Decimal {
    Decimal::from(500)
}

fn default_flat_shipping_rate() -> Decimal {
    Decimal::from(25)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_rate: default_flat_shipping_rate(),
        }
    }
}

/// Priced breakdown of a cart before any discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Sum of all line totals
    pub sub_total: Decimal,
    /// Tax on the subtotal, rounded to two digits
    pub tax: Decimal,
    /// Shipping cost, zero at or above the free-shipping threshold
    pub shipping_cost: Decimal,
}

impl Quote {
    /// Order total after subtracting a discount from subtotal, tax, and
    /// shipping.
    #[must_use]
    pub fn total(&self, discount: Decimal) -> Decimal {
        round_money(self.sub_total + self.tax + self.shipping_cost - discount)
    }
}

/// Rounds a monetary amount to two fractional digits.
///
/// Uses the default midpoint-to-even strategy so repeated calculations never
/// drift depending on which code path rounded them.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Quotes a set of cart lines against the store's pricing settings.
///
/// `sub_total` is the sum of `price_at_add * quantity` over the lines; tax is
/// `sub_total * tax_rate` rounded to two digits; shipping is free at or above
/// the configured threshold and the flat rate below it.
#[must_use]
pub fn quote(lines: &[cart_item::Model], config: &PricingConfig) -> Quote {
    let sub_total: Decimal = lines.iter().map(cart_item::Model::total).sum();
    let tax = round_money(sub_total * config.tax_rate);
    let shipping_cost = if sub_total >= config.free_shipping_threshold {
        Decimal::ZERO
    } else {
        config.flat_shipping_rate
    };

    Quote {
        sub_total,
        tax,
        shipping_cost,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    fn line(price: Decimal, quantity: i32) -> cart_item::Model {
        cart_item::Model {
            id: 0,
            user_id: "test_user".to_string(),
            product_id: 0,
            quantity,
            price_at_add: price,
            added_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_quote_empty_cart() {
        let q = quote(&[], &PricingConfig::default());
        assert_eq!(q.sub_total, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::ZERO);
        // An empty cart is below the threshold, so the flat rate applies
        assert_eq!(q.shipping_cost, dec!(25));
    }

    #[test]
    fn test_quote_sums_line_totals() {
        let lines = vec![line(dec!(19.99), 2), line(dec!(5.00), 3)];
        let q = quote(&lines, &PricingConfig::default());
        assert_eq!(q.sub_total, dec!(54.98));
        assert_eq!(q.tax, dec!(5.50));
        assert_eq!(q.shipping_cost, dec!(25));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let q = quote(&[line(dec!(500.00), 1)], &PricingConfig::default());
        assert_eq!(q.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_flat_shipping_just_below_threshold() {
        let q = quote(&[line(dec!(499.99), 1)], &PricingConfig::default());
        assert_eq!(q.shipping_cost, dec!(25));
    }

    #[test]
    fn test_reference_order_total() {
        // Subtotal 1000, 10% tax, free shipping over 500, 10% coupon:
        // tax = 100, shipping = 0, discount = 100, total = 1000
        let q = quote(&[line(dec!(250.00), 4)], &PricingConfig::default());
        assert_eq!(q.sub_total, dec!(1000.00));
        assert_eq!(q.tax, dec!(100.00));
        assert_eq!(q.shipping_cost, Decimal::ZERO);
        assert_eq!(q.total(dec!(100.00)), dec!(1000.00));
    }

    #[test]
    fn test_tax_rounds_to_two_digits() {
        let q = quote(&[line(dec!(33.33), 1)], &PricingConfig::default());
        assert_eq!(q.tax, dec!(3.33));
    }

    #[test]
    fn test_rounding_is_midpoint_to_even() {
        assert_eq!(round_money(dec!(2.125)), dec!(2.12));
        assert_eq!(round_money(dec!(2.135)), dec!(2.14));
    }

    #[test]
    fn test_custom_config() {
        let config = PricingConfig {
            tax_rate: dec!(0.20),
            free_shipping_threshold: dec!(100),
            flat_shipping_rate: dec!(10),
        };
        let q = quote(&[line(dec!(50.00), 1)], &config);
        assert_eq!(q.tax, dec!(10.00));
        assert_eq!(q.shipping_cost, dec!(10));
        assert_eq!(q.total(Decimal::ZERO), dec!(70.00));
    }
}
