//! Product entity - Represents an item in the storefront catalog.
//!
//! The order engine treats the catalog as read-only except for stock:
//! `stock_quantity` and the derived `in_stock` flag are mutated only by the
//! inventory ledger. Orders capture a snapshot of name, price, image, and
//! description at checkout, so later catalog edits never rewrite history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product
    pub name: String,
    /// Longer description shown on the product page
    pub description: String,
    /// URL of the primary product image
    pub image_url: String,
    /// Unit price in store currency, two fractional digits
    pub price: Decimal,
    /// Whether the product can currently be purchased
    pub in_stock: bool,
    /// Units available for sale, never negative
    pub stock_quantity: i32,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many cart lines
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One product appears in many order line snapshots
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
