//! Coupon usage entity - One redemption of a coupon by a user.
//!
//! The unique index on `coupon_id` + `user_id` is the enforcement mechanism
//! for "one redemption per user per coupon": concurrent redemption attempts
//! race on the insert, and the loser gets a constraint violation instead of
//! a second discount. Rows are only created inside a successful checkout
//! transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coupon usage database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupon_usages")]
pub struct Model {
    /// Unique identifier for the usage record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The coupon that was redeemed
    pub coupon_id: i64,
    /// The user who redeemed it
    pub user_id: String,
    /// The order the discount was applied to; a plain reference, not a
    /// foreign key, so usage history survives order archival
    pub order_id: Option<i64>,
    /// Discount amount granted by this redemption
    pub discount_amount: Decimal,
    /// When the redemption happened
    pub used_at: DateTimeUtc,
}

/// Defines relationships between CouponUsage and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each usage record belongs to one coupon
    #[sea_orm(
        belongs_to = "super::coupon::Entity",
        from = "Column::CouponId",
        to = "super::coupon::Column::Id"
    )]
    Coupon,
}

impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
