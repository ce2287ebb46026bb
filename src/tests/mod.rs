//! tests/mod.rs
//! Pruebas de integración del store, la API HTTP y el cliente.

mod store_tests;

use sqlx::{Pool, Sqlite};
use tempfile::TempDir;

use crate::services::message_service::{connect_pool, MessageService};

/// Base SQLite nueva en un directorio temporal. El `TempDir` debe vivir
/// mientras se use el servicio.
pub(crate) async fn test_store() -> (TempDir, MessageService, Pool<Sqlite>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("messages.db").display());
    let pool = connect_pool(&url, 4).await.expect("Failed to open test db");
    let service = MessageService::new(pool.clone());
    service
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    (dir, service, pool)
}
