//! Provisioning binary: prepares a storefront database.
//!
//! Initializes logging, loads `config.toml`, connects to the database,
//! creates the schema, and seeds the catalog and coupons. The HTTP/API
//! layer is deployed separately and only needs the database this produces.

use dotenvy::dotenv;
use medina_market::{config, errors::Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the store configuration
    let store_config = config::store::load_default_config()?;
    info!(
        order_prefix = %store_config.order_prefix,
        "loaded store configuration"
    );

    // 4. Connect and provision the schema
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(url = %config::database::get_database_url(), "database schema ready");

    // 5. Seed catalog and coupons from the configuration
    let (products, coupons) = config::seed::seed_catalog(&db, &store_config).await?;
    info!(products, coupons, "provisioning complete");

    Ok(())
}
