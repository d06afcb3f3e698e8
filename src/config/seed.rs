//! Seeds the catalog and coupon tables from store configuration.
//!
//! Runs at provisioning time and is idempotent: a product is matched by
//! name, a coupon by its uppercased code, and existing rows are left alone
//! so reprovisioning never clobbers live stock counts or redemption
//! counters.

use crate::config::store::StoreConfig;
use crate::entities::{Coupon, Product, coupon, product};
use crate::errors::Result;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

/// Inserts missing products and coupons from the configuration.
///
/// Returns how many of each were created.
pub async fn seed_catalog(db: &DatabaseConnection, config: &StoreConfig) -> Result<(u64, u64)> {
    let now = Utc::now();
    let mut products_created = 0;
    let mut coupons_created = 0;

    for seed in &config.products {
        let existing = Product::find()
            .filter(product::Column::Name.eq(seed.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        product::ActiveModel {
            name: Set(seed.name.clone()),
            description: Set(seed.description.clone()),
            image_url: Set(seed.image_url.clone()),
            price: Set(seed.price),
            in_stock: Set(seed.stock_quantity > 0),
            stock_quantity: Set(seed.stock_quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        products_created += 1;
    }

    for seed in &config.coupons {
        let code = seed.code.trim().to_uppercase();
        let existing = Coupon::find()
            .filter(coupon::Column::Code.eq(code.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        coupon::ActiveModel {
            code: Set(code),
            description: Set(seed.description.clone()),
            discount_percent: Set(seed.discount_percent),
            minimum_order_amount: Set(seed.minimum_order_amount),
            valid_from: Set(now),
            valid_until: Set(now + Duration::days(seed.valid_days)),
            usage_limit: Set(seed.usage_limit),
            times_used: Set(0),
            is_active: Set(true),
            require_confirmed_email: Set(seed.require_confirmed_email),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        coupons_created += 1;
    }

    info!(products_created, coupons_created, "seeded store catalog");
    Ok((products_created, coupons_created))
}
