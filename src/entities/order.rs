//! Order entity - A durable, priced record of a completed checkout.
//!
//! Monetary fields and line-item snapshots are immutable business facts once
//! the order is created. Only the status, tracking number, and the
//! shipped/delivered timestamps change afterwards, and only through the
//! lifecycle operations in [`crate::core::order`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who placed the order
    pub user_id: String,
    /// Human-readable order number, e.g. `MDM202608060001`, unique
    #[sea_orm(unique)]
    pub order_number: String,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Sum of all line totals at creation time
    pub sub_total: Decimal,
    /// Discount granted by the applied coupon, zero when none
    pub discount_amount: Decimal,
    /// Shipping cost charged for this order
    pub shipping_cost: Decimal,
    /// Tax charged for this order
    pub tax: Decimal,
    /// `sub_total + tax + shipping_cost - discount_amount`
    pub total: Decimal,
    /// The coupon applied to this order, if any
    pub coupon_id: Option<i64>,
    /// Shipping address chosen at checkout
    pub shipping_address_id: i64,
    /// Billing address chosen at checkout, shipping semantics when absent
    pub billing_address_id: Option<i64>,
    /// Free-form note from the shopper
    pub notes: Option<String>,
    /// When the order was placed
    pub order_date: DateTimeUtc,
    /// Stamped the first time the order becomes `Shipped`
    pub shipped_date: Option<DateTimeUtc>,
    /// Stamped the first time the order becomes `Delivered`
    pub delivered_date: Option<DateTimeUtc>,
    /// Carrier tracking number recorded when the order ships
    pub tracking_number: Option<String>,
}

/// Lifecycle status of an order.
///
/// `Pending` orders may be cancelled by their owner; administrators advance
/// statuses without a transition table. `Delivered`, `Cancelled`, and
/// `Refunded` are terminal.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum OrderStatus {
    /// Placed, payment pending, still cancellable by the owner
    #[sea_orm(num_value = 0)]
    Pending,
    /// Confirmed by the store
    #[sea_orm(num_value = 1)]
    Confirmed,
    /// Being prepared for shipment
    #[sea_orm(num_value = 2)]
    Processing,
    /// Handed to the carrier
    #[sea_orm(num_value = 3)]
    Shipped,
    /// Received by the customer
    #[sea_orm(num_value = 4)]
    Delivered,
    /// Cancelled while still pending, stock released
    #[sea_orm(num_value = 5)]
    Cancelled,
    /// Refunded by an administrator
    #[sea_orm(num_value = 6)]
    Refunded,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line-item snapshots
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// Each order may reference the coupon that discounted it
    #[sea_orm(
        belongs_to = "super::coupon::Entity",
        from = "Column::CouponId",
        to = "super::coupon::Column::Id"
    )]
    Coupon,
    /// Each order ships to one of the user's addresses
    #[sea_orm(
        belongs_to = "super::user_address::Entity",
        from = "Column::ShippingAddressId",
        to = "super::user_address::Column::Id"
    )]
    ShippingAddress,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
