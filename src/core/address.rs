//! Address lookups scoped to their owner.
//!
//! Checkout only cares that an address id belongs to the user placing the
//! order; everything inside the row is opaque to the order engine.

use crate::{
    entities::{UserAddress, user_address},
    errors::Result,
};
use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};

/// Fetches an address only when it belongs to the user.
pub async fn get_user_address<C>(
    db: &C,
    user_id: &str,
    address_id: i64,
) -> Result<Option<user_address::Model>>
where
    C: ConnectionTrait,
{
    UserAddress::find()
        .filter(user_address::Column::Id.eq(address_id))
        .filter(user_address::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the user's addresses, default first, then newest first.
pub async fn get_user_addresses<C>(db: &C, user_id: &str) -> Result<Vec<user_address::Model>>
where
    C: ConnectionTrait,
{
    UserAddress::find()
        .filter(user_address::Column::UserId.eq(user_id))
        .order_by_desc(user_address::Column::IsDefault)
        .order_by_desc(user_address::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
