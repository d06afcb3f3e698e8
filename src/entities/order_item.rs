//! Order item entity - Snapshot of one purchased line.
//!
//! Name, unit price, image, and description are copied from the product at
//! order time, intentionally decoupled from the live catalog so historical
//! orders stay accurate when the catalog changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the line snapshot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The order this line belongs to
    pub order_id: i64,
    /// The catalog product this line was created from
    pub product_id: i64,
    /// Product name at order time
    pub product_name: String,
    /// Units purchased, at least 1
    pub quantity: i32,
    /// Unit price at order time
    pub unit_price: Decimal,
    /// `unit_price * quantity`
    pub total: Decimal,
    /// Product image URL at order time
    pub product_image_url: Option<String>,
    /// Product description at order time
    pub product_description: Option<String>,
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line snapshot belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each line snapshot refers back to one catalog product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
