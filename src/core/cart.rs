//! Cart business logic - The lines a user intends to buy.
//!
//! A cart line snapshots the unit price when it is first added; checkout
//! prices the snapshot, not the live catalog. Stock checks here are
//! advisory (they keep the cart honest while browsing), the binding check
//! is the atomic reservation at checkout.

use crate::{
    core::pricing::{self, PricingConfig, Quote},
    entities::{CartItem, Product, cart_item, product},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};
use tracing::info;

/// A cart line together with its live product row.
pub type CartLine = (cart_item::Model, product::Model);

/// Priced view of a user's cart for the cart page.
#[derive(Debug, Clone)]
pub struct CartSummary {
    /// Cart lines with their product rows, oldest first
    pub lines: Vec<CartLine>,
    /// Total units across all lines
    pub total_items: i32,
    /// Subtotal, tax, and shipping for the cart
    pub quote: Quote,
    /// Pre-discount total the cart would check out at
    pub total: Decimal,
}

/// Retrieves the user's cart lines with their product rows, oldest first.
pub async fn get_cart_items<C>(db: &C, user_id: &str) -> Result<Vec<CartLine>>
where
    C: ConnectionTrait,
{
    let rows = CartItem::find()
        .find_also_related(Product)
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::AddedAt)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(line, found)| {
            let product_id = line.product_id;
            found.map(|p| (line, p)).ok_or_else(|| {
                DbErr::RecordNotFound(format!("product {product_id} behind a cart line")).into()
            })
        })
        .collect()
}

/// Retrieves a single cart line for the user and product, if present.
pub async fn get_cart_item<C>(
    db: &C,
    user_id: &str,
    product_id: i64,
) -> Result<Option<cart_item::Model>>
where
    C: ConnectionTrait,
{
    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds `quantity` units of a product to the user's cart.
///
/// Merges into the existing line when the user already carries the product,
/// keeping the original price snapshot. The merged quantity may not exceed
/// the product's current stock.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for a non-positive quantity,
/// [`Error::ProductNotFound`] for an unknown product, and
/// [`Error::InsufficientStock`] when the product is out of stock or the
/// requested quantity exceeds what remains.
pub async fn add_to_cart<C>(
    db: &C,
    user_id: &str,
    product_id: i64,
    quantity: i32,
) -> Result<cart_item::Model>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let wanted = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    if !wanted.in_stock || wanted.stock_quantity < quantity {
        return Err(Error::InsufficientStock { product_id });
    }

    let line = match get_cart_item(db, user_id, product_id).await? {
        Some(existing) => {
            let merged = existing.quantity + quantity;
            if merged > wanted.stock_quantity {
                return Err(Error::InsufficientStock { product_id });
            }

            let mut active: cart_item::ActiveModel = existing.into();
            active.quantity = Set(merged);
            active.added_at = Set(Utc::now());
            active.update(db).await?
        }
        None => {
            let fresh = cart_item::ActiveModel {
                user_id: Set(user_id.to_string()),
                product_id: Set(product_id),
                quantity: Set(quantity),
                price_at_add: Set(wanted.price),
                added_at: Set(Utc::now()),
                ..Default::default()
            };
            fresh.insert(db).await?
        }
    };

    info!(user_id, product_id, quantity, "added product to cart");
    Ok(line)
}

/// Sets the quantity of an existing cart line.
///
/// A quantity of zero or less removes the line; otherwise the new quantity
/// must fit within the product's current stock.
pub async fn update_cart_item<C>(
    db: &C,
    user_id: &str,
    product_id: i64,
    quantity: i32,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = get_cart_item(db, user_id, product_id)
        .await?
        .ok_or(Error::CartItemNotFound)?;

    if quantity <= 0 {
        return remove_from_cart(db, user_id, product_id).await;
    }

    let backing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    if quantity > backing.stock_quantity {
        return Err(Error::InsufficientStock { product_id });
    }

    let mut active: cart_item::ActiveModel = existing.into();
    active.quantity = Set(quantity);
    active.update(db).await?;

    info!(user_id, product_id, quantity, "updated cart line quantity");
    Ok(())
}

/// Removes the user's cart line for a product.
pub async fn remove_from_cart<C>(db: &C, user_id: &str, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = get_cart_item(db, user_id, product_id)
        .await?
        .ok_or(Error::CartItemNotFound)?;

    existing.delete(db).await?;

    info!(user_id, product_id, "removed product from cart");
    Ok(())
}

/// Deletes every cart line the user holds. Clearing an empty cart is fine.
pub async fn clear_cart<C>(db: &C, user_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Total units across the user's cart lines.
pub async fn get_cart_item_count<C>(db: &C, user_id: &str) -> Result<i32>
where
    C: ConnectionTrait,
{
    let lines = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(lines.iter().map(|line| line.quantity).sum())
}

/// Sum of line totals across the user's cart.
pub async fn get_cart_total<C>(db: &C, user_id: &str) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let lines = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(lines.iter().map(cart_item::Model::total).sum())
}

/// Builds the priced cart view: lines, unit count, quote, and total.
pub async fn get_cart_summary<C>(
    db: &C,
    user_id: &str,
    config: &PricingConfig,
) -> Result<CartSummary>
where
    C: ConnectionTrait,
{
    let lines = get_cart_items(db, user_id).await?;
    let total_items = lines.iter().map(|(line, _)| line.quantity).sum();
    let cart_lines: Vec<cart_item::Model> =
        lines.iter().map(|(line, _)| line.clone()).collect();
    let quote = pricing::quote(&cart_lines, config);
    let total = quote.total(Decimal::ZERO);

    Ok(CartSummary {
        lines,
        total_items,
        quote,
        total,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_product, setup_test_db};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_add_to_cart_snapshots_price() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(39.99), 10).await?;

        let line = add_to_cart(&db, "user1", product.id, 2).await?;
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price_at_add, dec!(39.99));
        assert_eq!(line.total(), dec!(79.98));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_cart_merges_existing_line() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(39.99), 10).await?;

        add_to_cart(&db, "user1", product.id, 2).await?;
        let merged = add_to_cart(&db, "user1", product.id, 3).await?;

        assert_eq!(merged.quantity, 5);

        let lines = get_cart_items(&db, "user1").await?;
        assert_eq!(lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_over_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(39.99), 4).await?;

        assert!(matches!(
            add_to_cart(&db, "user1", product.id, 5).await.unwrap_err(),
            Error::InsufficientStock { .. }
        ));

        // A merge may not push past stock either
        add_to_cart(&db, "user1", product.id, 3).await?;
        assert!(matches!(
            add_to_cart(&db, "user1", product.id, 2).await.unwrap_err(),
            Error::InsufficientStock { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_cart_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            add_to_cart(&db, "user1", 999, 1).await.unwrap_err(),
            Error::ProductNotFound { product_id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_cart_item_to_zero_removes_line() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(39.99), 10).await?;

        add_to_cart(&db, "user1", product.id, 2).await?;
        update_cart_item(&db, "user1", product.id, 0).await?;

        assert!(get_cart_item(&db, "user1", product.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_cart_item_caps_at_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(39.99), 5).await?;

        add_to_cart(&db, "user1", product.id, 2).await?;
        assert!(matches!(
            update_cart_item(&db, "user1", product.id, 6)
                .await
                .unwrap_err(),
            Error::InsufficientStock { .. }
        ));

        update_cart_item(&db, "user1", product.id, 5).await?;
        let line = get_cart_item(&db, "user1", product.id).await?.unwrap();
        assert_eq!(line.quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_line() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            remove_from_cart(&db, "user1", 1).await.unwrap_err(),
            Error::CartItemNotFound
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_product(&db, "Atlas Tile", dec!(39.99), 10).await?;
        let second = create_test_product(&db, "Fez Bowl", dec!(24.50), 10).await?;

        add_to_cart(&db, "user1", first.id, 1).await?;
        add_to_cart(&db, "user1", second.id, 2).await?;
        add_to_cart(&db, "user2", first.id, 1).await?;

        clear_cart(&db, "user1").await?;

        assert!(get_cart_items(&db, "user1").await?.is_empty());
        // Other carts are untouched
        assert_eq!(get_cart_items(&db, "user2").await?.len(), 1);

        // Clearing again is a no-op
        clear_cart(&db, "user1").await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_count_and_total() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_product(&db, "Atlas Tile", dec!(10.00), 10).await?;
        let second = create_test_product(&db, "Fez Bowl", dec!(7.25), 10).await?;

        add_to_cart(&db, "user1", first.id, 3).await?;
        add_to_cart(&db, "user1", second.id, 2).await?;

        assert_eq!(get_cart_item_count(&db, "user1").await?, 5);
        assert_eq!(get_cart_total(&db, "user1").await?, dec!(44.50));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_summary() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Atlas Tile", dec!(100.00), 10).await?;

        add_to_cart(&db, "user1", product.id, 2).await?;

        let summary = get_cart_summary(&db, "user1", &PricingConfig::default()).await?;
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.quote.sub_total, dec!(200.00));
        assert_eq!(summary.quote.tax, dec!(20.00));
        assert_eq!(summary.quote.shipping_cost, dec!(25));
        assert_eq!(summary.total, dec!(245.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_lines_ordered_by_added_at() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_product(&db, "Atlas Tile", dec!(10.00), 10).await?;
        let second = create_test_product(&db, "Fez Bowl", dec!(7.25), 10).await?;

        add_to_cart(&db, "user1", first.id, 1).await?;
        add_to_cart(&db, "user1", second.id, 1).await?;

        let lines = get_cart_items(&db, "user1").await?;
        assert_eq!(lines[0].1.name, "Atlas Tile");
        assert_eq!(lines[1].1.name, "Fez Bowl");

        Ok(())
    }
}
