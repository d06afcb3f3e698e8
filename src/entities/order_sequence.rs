//! Order sequence entity - Per-day counter backing order number allocation.
//!
//! One row per calendar day, keyed by the `YYYYMMDD` string that also appears
//! in the order number. `last_value` only moves forward, through the
//! compare-and-swap loop in [`crate::core::order_number`], which keeps
//! allocation collision-free under concurrent checkouts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order sequence database model - one counter row per day
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_sequences")]
pub struct Model {
    /// Calendar day in `YYYYMMDD` form
    #[sea_orm(primary_key, auto_increment = false)]
    pub day: String,
    /// Highest sequence number handed out for this day
    pub last_value: i64,
}

/// `OrderSequence` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
