/// Database connection, schema creation, and unique indexes
pub mod database;

/// Catalog and coupon seeding from store configuration
pub mod seed;

/// Store settings loading from config.toml
pub mod store;
