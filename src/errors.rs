//! Unified error types for the order-fulfillment core.
//!
//! Every expected, recoverable condition is a typed variant so callers can
//! render a specific message. Persistence-layer failures propagate through
//! the `Database` variant; retrying them is the caller's concern.

use crate::core::coupon::CouponRejection;
use crate::entities::order::OrderStatus;
use thiserror::Error;

/// Error type for all storefront core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Checkout was attempted with no lines in the cart.
    #[error("Cannot create an order from an empty cart")]
    EmptyCart,

    /// The supplied address does not exist or belongs to another user.
    #[error("Address does not exist or does not belong to this user")]
    InvalidAddress,

    /// A stock reservation would have driven a product's quantity negative.
    #[error("Insufficient stock for product {product_id}")]
    InsufficientStock {
        /// The product whose reservation failed
        product_id: i64,
    },

    /// A coupon could not be applied or redeemed.
    #[error("Coupon not applicable: {0}")]
    CouponNotApplicable(CouponRejection),

    /// The product does not exist or is not purchasable.
    #[error("Product {product_id} not found")]
    ProductNotFound {
        /// The product that was requested
        product_id: i64,
    },

    /// The user has no cart line for the product.
    #[error("Cart item not found")]
    CartItemNotFound,

    /// The order does not exist or belongs to another user.
    #[error("Order not found")]
    OrderNotFound,

    /// The order is not in a state that permits the requested transition.
    #[error("Order cannot change state from {from:?}")]
    IllegalStateTransition {
        /// The status the order currently holds
        from: OrderStatus,
    },

    /// A concurrent writer won a conditional update and retries ran out.
    #[error("Concurrent update conflict, please retry")]
    ConcurrencyConflict,

    /// A quantity was zero or negative where at least one unit is required.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i32,
    },

    /// Configuration error with a descriptive message.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Database error from the persistence layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error, typically while reading configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Whether a database error is a unique-constraint violation.
///
/// Conditional inserts race on unique indexes on purpose (coupon usage,
/// daily order sequence); the losers must be told apart from genuine
/// failures.
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
