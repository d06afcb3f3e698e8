//! Inventory ledger - Authoritative stock bookkeeping for the catalog.
//!
//! Stock moves only through single conditional UPDATE statements so a
//! read-then-write gap never exists for other transactions to slip into.
//! A reservation decrements `stock_quantity` only where enough stock remains;
//! zero rows affected means the product was missing or short, and the caller
//! gets `InsufficientStock`. The derived `in_stock` flag is recomputed from
//! the post-update quantity in the same breath.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, sea_query::Expr, prelude::*};
use tracing::warn;

/// Atomically reserves `quantity` units of a product.
///
/// Performs `UPDATE products SET stock_quantity = stock_quantity - ?,
/// in_stock = stock_quantity - ? > 0 WHERE id = ? AND stock_quantity >= ?`
/// and fails with [`Error::InsufficientStock`] when no row qualifies, so
/// concurrent reservations can never drive stock negative and no reader
/// ever sees the new quantity next to a stale flag.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for a non-positive quantity and
/// [`Error::InsufficientStock`] when the product is missing or short.
pub async fn reserve<C>(db: &C, product_id: i64, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    // Both column expressions see the pre-update quantity, so the flag is
    // computed from the same value the decrement applies to
    let updated = Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).sub(quantity),
        )
        .col_expr(
            product::Column::InStock,
            Expr::expr(Expr::col(product::Column::StockQuantity).sub(quantity)).gt(0),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::StockQuantity.gte(quantity))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::InsufficientStock { product_id });
    }

    Ok(())
}

/// Atomically releases `quantity` units back to a product's stock.
///
/// Used when a pending order is cancelled; the lifecycle manager invokes it
/// exactly once per order item. A missing product row is logged and skipped,
/// since there is no stock left to restore for a row that no longer exists.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for a non-positive quantity.
pub async fn release<C>(db: &C, product_id: i64, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let updated = Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).add(quantity),
        )
        .col_expr(
            product::Column::InStock,
            Expr::expr(Expr::col(product::Column::StockQuantity).add(quantity)).gt(0),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        warn!(product_id, quantity, "release skipped, product no longer exists");
    }

    Ok(())
}
