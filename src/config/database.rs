//! Database configuration module for the storefront core.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust structs. On top of the generated tables this module creates the
//! unique indexes the engine's concurrency story leans on: one cart line per
//! user and product, and one coupon redemption per user and coupon.

use crate::entities::{
    CartItem, CartItemColumn, Coupon, CouponUsage, CouponUsageColumn, Order, OrderItem,
    OrderSequence, Product, UserAddress,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, Schema,
    sea_query::{Index, IndexCreateStatement},
};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/medina_market.sqlite?mode=rwc".to_string())
}

/// Establishes a connection using the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables and unique indexes from the entity definitions.
///
/// Safe to run against an already-provisioned database: both the tables and
/// the indexes are created with `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children, so foreign keys always have a target
    let mut product_table = schema.create_table_from_entity(Product);
    let mut user_address_table = schema.create_table_from_entity(UserAddress);
    let mut coupon_table = schema.create_table_from_entity(Coupon);
    let mut cart_item_table = schema.create_table_from_entity(CartItem);
    let mut coupon_usage_table = schema.create_table_from_entity(CouponUsage);
    let mut order_table = schema.create_table_from_entity(Order);
    let mut order_item_table = schema.create_table_from_entity(OrderItem);
    let mut order_sequence_table = schema.create_table_from_entity(OrderSequence);

    db.execute(builder.build(product_table.if_not_exists()))
        .await?;
    db.execute(builder.build(user_address_table.if_not_exists()))
        .await?;
    db.execute(builder.build(coupon_table.if_not_exists())).await?;
    db.execute(builder.build(cart_item_table.if_not_exists()))
        .await?;
    db.execute(builder.build(coupon_usage_table.if_not_exists()))
        .await?;
    db.execute(builder.build(order_table.if_not_exists())).await?;
    db.execute(builder.build(order_item_table.if_not_exists()))
        .await?;
    db.execute(builder.build(order_sequence_table.if_not_exists()))
        .await?;

    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Composite unique indexes the engine's invariants rely on.
///
/// One cart line per (user, product) and one coupon redemption per
/// (coupon, user); single-column uniques (coupon code, order number) are
/// declared on the entities themselves.
fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_cart_items_user_product")
            .table(CartItem)
            .col(CartItemColumn::UserId)
            .col(CartItemColumn::ProductId)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_coupon_usages_coupon_user")
            .table(CouponUsage)
            .col(CouponUsageColumn::CouponId)
            .col(CouponUsageColumn::UserId)
            .unique()
            .to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        cart_item::Model as CartItemModel, coupon::Model as CouponModel,
        order::Model as OrderModel, product::Model as ProductModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist and answer queries
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<CartItemModel> = CartItem::find().limit(1).all(&db).await?;
        let _: Vec<CouponModel> = Coupon::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_line_uniqueness_is_enforced() -> Result<()> {
        use crate::entities::cart_item;
        use crate::test_utils::{create_test_product, setup_test_db};
        use sea_orm::{ActiveModelTrait, Set};

        let db = setup_test_db().await?;
        let product =
            create_test_product(&db, "Atlas Tile", rust_decimal::Decimal::ONE, 5).await?;

        let line = cart_item::ActiveModel {
            user_id: Set("user1".to_string()),
            product_id: Set(product.id),
            quantity: Set(1),
            price_at_add: Set(rust_decimal::Decimal::ONE),
            added_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        line.insert(&db).await?;

        let duplicate = cart_item::ActiveModel {
            user_id: Set("user1".to_string()),
            product_id: Set(product.id),
            quantity: Set(2),
            price_at_add: Set(rust_decimal::Decimal::ONE),
            added_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        assert!(duplicate.insert(&db).await.is_err());

        Ok(())
    }
}
