//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod coupon;
pub mod coupon_usage;
pub mod order;
pub mod order_item;
pub mod order_sequence;
pub mod product;
pub mod user_address;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use coupon::{Column as CouponColumn, Entity as Coupon, Model as CouponModel};
pub use coupon_usage::{
    Column as CouponUsageColumn, Entity as CouponUsage, Model as CouponUsageModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use order_sequence::{
    Column as OrderSequenceColumn, Entity as OrderSequence, Model as OrderSequenceModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use user_address::{
    Column as UserAddressColumn, Entity as UserAddress, Model as UserAddressModel,
};
