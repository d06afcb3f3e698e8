//! Order business logic - Checkout orchestration and the order lifecycle.
//!
//! `create_order` is the transaction boundary of the whole engine: cart,
//! addresses, pricing, coupon, stock reservation, order number, snapshot
//! rows, redemption, and cart clearing either all land or none do. Early
//! returns drop the open transaction, which rolls everything back. After
//! creation the order only changes through `cancel_order` and
//! `advance_order_status`.

use crate::{
    config::store::StoreConfig,
    core::{
        address, cart,
        coupon::{self, CouponEvaluation},
        inventory, order_number, pricing,
    },
    entities::{Order, OrderItem, OrderStatus, coupon as coupon_entity, order, order_item},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    DatabaseConnection, PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::*,
};
use tracing::{info, warn};

use super::coupon::AccountDirectory;

/// Converts the user's cart into a durable order inside one transaction.
///
/// The sequence: load the cart (`EmptyCart` when bare), verify address
/// ownership (`InvalidAddress`), price the lines, evaluate the coupon (an
/// ineligible code degrades to zero discount and never blocks checkout),
/// allocate the order number, reserve stock line by line
/// (`InsufficientStock` rolls the whole attempt back), persist the order
/// with its line snapshots, redeem the coupon, clear the cart, commit. The
/// order is only returned once the commit succeeded; a failure at any step
/// leaves cart, stock, and coupon state untouched.
#[allow(clippy::too_many_arguments)]
pub async fn create_order<A>(
    db: &DatabaseConnection,
    accounts: &A,
    config: &StoreConfig,
    user_id: &str,
    shipping_address_id: i64,
    billing_address_id: Option<i64>,
    coupon_code: Option<&str>,
    notes: Option<String>,
) -> Result<order::Model>
where
    A: AccountDirectory,
{
    let txn = db.begin().await?;

    let lines = cart::get_cart_items(&txn, user_id).await?;
    if lines.is_empty() {
        return Err(Error::EmptyCart);
    }

    address::get_user_address(&txn, user_id, shipping_address_id)
        .await?
        .ok_or(Error::InvalidAddress)?;

    if let Some(billing_id) = billing_address_id {
        address::get_user_address(&txn, user_id, billing_id)
            .await?
            .ok_or(Error::InvalidAddress)?;
    }

    let cart_lines: Vec<_> = lines.iter().map(|(line, _)| line.clone()).collect();
    let quote = pricing::quote(&cart_lines, &config.pricing);

    let mut applied: Option<(coupon_entity::Model, Decimal)> = None;
    if let Some(code) = coupon_code {
        match coupon::evaluate_coupon(&txn, accounts, user_id, code).await? {
            CouponEvaluation::Eligible(eligible) => {
                let discount = coupon::discount_for(&eligible, quote.sub_total);
                if discount > Decimal::ZERO {
                    applied = Some((eligible, discount));
                }
            }
            CouponEvaluation::Ineligible(reason) => {
                // A bad coupon degrades to "no discount" instead of blocking
                // the purchase
                warn!(user_id, %reason, "checkout coupon rejected");
            }
        }
    }

    let discount_amount = applied.as_ref().map_or(Decimal::ZERO, |(_, d)| *d);
    let total = quote.total(discount_amount);
    let now = Utc::now();
    let number = order_number::allocate(&txn, &config.order_prefix, now).await?;

    for (line, _) in &lines {
        inventory::reserve(&txn, line.product_id, line.quantity).await?;
    }

    let placed = order::ActiveModel {
        user_id: Set(user_id.to_string()),
        order_number: Set(number.clone()),
        status: Set(OrderStatus::Pending),
        sub_total: Set(quote.sub_total),
        discount_amount: Set(discount_amount),
        shipping_cost: Set(quote.shipping_cost),
        tax: Set(quote.tax),
        total: Set(total),
        coupon_id: Set(applied.as_ref().map(|(c, _)| c.id)),
        shipping_address_id: Set(shipping_address_id),
        billing_address_id: Set(billing_address_id),
        notes: Set(notes),
        order_date: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (line, product) in &lines {
        order_item::ActiveModel {
            order_id: Set(placed.id),
            product_id: Set(line.product_id),
            product_name: Set(product.name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.price_at_add),
            total: Set(line.total()),
            product_image_url: Set(Some(product.image_url.clone())),
            product_description: Set(Some(product.description.clone())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    if let Some((redeemed, discount)) = &applied {
        coupon::redeem_coupon(&txn, user_id, redeemed, placed.id, *discount).await?;
    }

    cart::clear_cart(&txn, user_id).await?;

    txn.commit().await?;

    info!(order_number = %number, user_id, %total, "created order");
    Ok(placed)
}

/// Fetches an order with its line snapshots, scoped to the owning user.
pub async fn get_order(
    db: &DatabaseConnection,
    order_id: i64,
    user_id: &str,
) -> Result<(order::Model, Vec<order_item::Model>)> {
    let found = Order::find()
        .filter(order::Column::Id.eq(order_id))
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound)?;

    let items = found.find_related(OrderItem).all(db).await?;
    Ok((found, items))
}

/// Lists the user's orders, newest first.
pub async fn get_user_orders(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::OrderDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Cancels a pending order and returns its stock to the shelf.
///
/// Only the owner may cancel, and only while the status is exactly
/// `Pending`; anything else fails with `IllegalStateTransition` and leaves
/// both the order and the inventory untouched. Every line's quantity is
/// released exactly once, inside the same transaction that flips the
/// status.
pub async fn cancel_order(
    db: &DatabaseConnection,
    order_id: i64,
    user_id: &str,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let found = Order::find()
        .filter(order::Column::Id.eq(order_id))
        .filter(order::Column::UserId.eq(user_id))
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound)?;

    if found.status != OrderStatus::Pending {
        return Err(Error::IllegalStateTransition { from: found.status });
    }

    let items = found.find_related(OrderItem).all(&txn).await?;
    for item in &items {
        inventory::release(&txn, item.product_id, item.quantity).await?;
    }

    let mut active: order::ActiveModel = found.into();
    active.status = Set(OrderStatus::Cancelled);
    let cancelled = active.update(&txn).await?;

    txn.commit().await?;

    info!(order_id, user_id, "cancelled order");
    Ok(cancelled)
}

/// Sets an order's status on behalf of an administrator.
///
/// No transition table is enforced beyond administrator trust. The first
/// time the status becomes `Shipped` the shipping timestamp is stamped and
/// a supplied tracking number recorded; the first time it becomes
/// `Delivered` the delivery timestamp is stamped. Re-entering a status
/// never overwrites an existing stamp.
pub async fn advance_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    new_status: OrderStatus,
    tracking_number: Option<String>,
) -> Result<order::Model> {
    let found = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound)?;

    let previous = found.status;
    let mut active: order::ActiveModel = found.clone().into();
    active.status = Set(new_status);

    match new_status {
        OrderStatus::Shipped if found.shipped_date.is_none() => {
            active.shipped_date = Set(Some(Utc::now()));
            if let Some(tracking) = tracking_number.filter(|t| !t.is_empty()) {
                active.tracking_number = Set(Some(tracking));
            }
        }
        OrderStatus::Delivered if found.delivered_date.is_none() => {
            active.delivered_date = Set(Some(Utc::now()));
        }
        _ => {}
    }

    let updated = active.update(db).await?;

    info!(order_id, ?previous, ?new_status, "updated order status");
    Ok(updated)
}

/// Counts orders currently holding a status.
pub async fn get_order_count_by_status(
    db: &DatabaseConnection,
    status: OrderStatus,
) -> Result<u64> {
    Order::find()
        .filter(order::Column::Status.eq(status))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Sums the totals of all orders holding a status.
pub async fn get_revenue_by_status(
    db: &DatabaseConnection,
    status: OrderStatus,
) -> Result<Decimal> {
    let orders = Order::find()
        .filter(order::Column::Status.eq(status))
        .all(db)
        .await?;
    Ok(orders.iter().map(|o| o.total).sum())
}

/// The most recently placed orders, capped at `limit`.
pub async fn get_recent_orders(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::OrderDate)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
