pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod store;

use std::sync::Arc;

pub use manager::DatabaseError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{CompanyStore, Store, UserStore};

use crate::config::DatabaseConfig;

/// PostgreSQL when a URL is configured, otherwise the in-memory store.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    if config.url.is_none() {
        tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = manager::connect(config).await?;
    manager::ensure_schema(&pool).await?;
    Ok(Arc::new(PgStore::new(pool)))
}
