//! Coupon entity - A percentage discount redeemable at checkout.
//!
//! Codes are stored uppercase and matched case-insensitively. A coupon is
//! currently valid when it is active, the clock is inside its validity
//! window, and its usage limit (if any) has headroom. `times_used` is only
//! incremented through the guarded update in [`crate::core::coupon`], inside
//! the same transaction that creates the order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coupon database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    /// Unique identifier for the coupon
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Redemption code, stored uppercase, unique
    #[sea_orm(unique)]
    pub code: String,
    /// Human-readable description of the promotion
    pub description: String,
    /// Discount percentage in the range [0, 100]
    pub discount_percent: Decimal,
    /// Subtotal below which the coupon yields no discount, if set
    pub minimum_order_amount: Option<Decimal>,
    /// Start of the validity window
    pub valid_from: DateTimeUtc,
    /// End of the validity window
    pub valid_until: DateTimeUtc,
    /// Maximum number of redemptions across all users, if set
    pub usage_limit: Option<i32>,
    /// Redemptions recorded so far
    pub times_used: i32,
    /// Whether the coupon is enabled at all
    pub is_active: bool,
    /// Whether redemption requires a confirmed email address
    pub require_confirmed_email: bool,
    /// When the coupon was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Coupon and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One coupon has many usage records
    #[sea_orm(has_many = "super::coupon_usage::Entity")]
    CouponUsages,
}

impl Related<super::coupon_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the coupon can be redeemed at `now`: active, inside the
    /// validity window, and under its usage limit when one is set.
    #[must_use]
    pub fn is_currently_valid(&self, now: DateTimeUtc) -> bool {
        self.is_active
            && now >= self.valid_from
            && now <= self.valid_until
            && self.usage_limit.is_none_or(|limit| self.times_used < limit)
    }
}
