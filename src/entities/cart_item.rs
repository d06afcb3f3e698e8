//! Cart item entity - One user/product line awaiting checkout.
//!
//! A user holds at most one line per product (unique index on
//! `user_id` + `product_id`); adding the same product again merges into the
//! existing line. The unit price is captured when the line is first added so
//! checkout prices what the shopper saw, not what the catalog says later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who owns this cart line
    pub user_id: String,
    /// Product this line refers to
    pub product_id: i64,
    /// Units of the product in the cart, at least 1
    pub quantity: i32,
    /// Unit price captured when the line was added
    pub price_at_add: Decimal,
    /// When the line was added or last merged into
    pub added_at: DateTimeUtc,
}

/// Defines relationships between CartItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart line refers to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Line total: unit price at add time times quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price_at_add * Decimal::from(self.quantity)
    }
}
