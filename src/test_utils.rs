//! Shared test utilities for the storefront core.
//!
//! Provides an in-memory database with the full schema plus fixture helpers
//! with sensible defaults, so tests only spell out what they are about.

use crate::{
    core::coupon::AccountDirectory,
    entities::{coupon, product, user_address},
    errors::Result,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables and indexes.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Account directory stub answering the same for every user.
#[derive(Debug, Clone, Copy)]
pub struct StaticAccounts {
    /// The answer every `is_email_confirmed` call gets
    pub confirmed: bool,
}

impl StaticAccounts {
    /// Directory in which every account is confirmed.
    #[must_use]
    pub const fn confirmed() -> Self {
        Self { confirmed: true }
    }

    /// Directory in which no account is confirmed.
    #[must_use]
    pub const fn unconfirmed() -> Self {
        Self { confirmed: false }
    }
}

impl AccountDirectory for StaticAccounts {
    async fn is_email_confirmed(&self, _user_id: &str) -> Result<bool> {
        Ok(self.confirmed)
    }
}

/// Creates a test product with the given price and stock.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    stock_quantity: i32,
) -> Result<product::Model> {
    let now = Utc::now();
    product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        image_url: Set(format!("/img/{}.jpg", name.to_lowercase().replace(' ', "-"))),
        price: Set(price),
        in_stock: Set(stock_quantity > 0),
        stock_quantity: Set(stock_quantity),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test address owned by `user_id`.
pub async fn create_test_address(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<user_address::Model> {
    user_address::ActiveModel {
        user_id: Set(user_id.to_string()),
        address_name: Set("Home".to_string()),
        street_address: Set("12 Rue des Andalous".to_string()),
        address_line2: Set(None),
        city: Set("Meknes".to_string()),
        state: Set("Fes-Meknes".to_string()),
        postal_code: Set("50000".to_string()),
        country: Set("Morocco".to_string()),
        phone: Set(None),
        is_default: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active test coupon with a wide validity window, no minimum,
/// no usage limit, and no email-confirmation requirement.
pub async fn create_test_coupon(
    db: &DatabaseConnection,
    code: &str,
    discount_percent: Decimal,
) -> Result<coupon::Model> {
    create_custom_coupon(db, code, discount_percent, None, None, true, false).await
}

/// Creates a test coupon with custom gating.
/// Use this when a test needs a minimum order amount, usage limit,
/// inactive coupon, or email-confirmation requirement.
pub async fn create_custom_coupon(
    db: &DatabaseConnection,
    code: &str,
    discount_percent: Decimal,
    minimum_order_amount: Option<Decimal>,
    usage_limit: Option<i32>,
    is_active: bool,
    require_confirmed_email: bool,
) -> Result<coupon::Model> {
    let now = Utc::now();
    coupon::ActiveModel {
        code: Set(code.to_uppercase()),
        description: Set(format!("{code} test coupon")),
        discount_percent: Set(discount_percent),
        minimum_order_amount: Set(minimum_order_amount),
        valid_from: Set(now - Duration::days(1)),
        valid_until: Set(now + Duration::days(30)),
        usage_limit: Set(usage_limit),
        times_used: Set(0),
        is_active: Set(is_active),
        require_confirmed_email: Set(require_confirmed_email),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
