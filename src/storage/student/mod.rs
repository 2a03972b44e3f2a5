pub mod in_memory;
pub mod postgres;
pub mod store;

pub use in_memory::InMemoryStudentStore;
pub use postgres::PostgresStudentStore;
pub use store::{ListQuery, StoreError, StudentPage, StudentStore, DEFAULT_PER_PAGE, MAX_PER_PAGE};

use crate::infra::config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Opens the store selected by `config`: PostgreSQL when `DATABASE_URL` is set,
/// otherwise a process-local in-memory store.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn StudentStore>, StoreError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresStudentStore::connect(url, config.db_max_connections).await?;
            store.ensure_schema().await?;
            info!(max_connections = config.db_max_connections, "connected to PostgreSQL student store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set; using an in-memory student store (data is lost on exit)");
            Ok(Arc::new(InMemoryStudentStore::new()))
        }
    }
}
