//! User address entity - A saved shipping or billing destination.
//!
//! The order core only checks ownership; the field contents are opaque to it
//! and belong to the address-book layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User address database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_addresses")]
pub struct Model {
    /// Unique identifier for the address
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who owns this address
    pub user_id: String,
    /// Label chosen by the user, e.g. "Home" or "Warehouse"
    pub address_name: String,
    /// Street address line
    pub street_address: String,
    /// Optional second address line
    pub address_line2: Option<String>,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
    /// Optional contact phone number
    pub phone: Option<String>,
    /// Whether this is the user's default address
    pub is_default: bool,
    /// When the address was created
    pub created_at: DateTimeUtc,
}

/// `UserAddress` is only navigated from the order side
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
