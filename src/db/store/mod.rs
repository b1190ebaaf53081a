//! Repository seam between the todo service and whatever holds the records.

mod database;
mod memory;

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{config::AppConfig, db::connection, todos::Todo};

use super::dao::DaoLayerError;

pub use database::DatabaseTodoStore;
pub use memory::MemoryTodoStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Dao(#[from] DaoLayerError),
    #[error("stored todo {id} is invalid: {reason}")]
    InvalidRow { id: Uuid, reason: String },
    #[error("snapshot io error at {}: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot encoding error: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record storage. Single-record writes are atomic; owner checks are the
/// caller's job except for `delete_owned`, which scopes the delete itself.
#[async_trait]
pub trait TodoStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Todo>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    async fn insert(&self, todo: Todo) -> StoreResult<Todo>;

    /// Overwrites the record with the same id. `None` if it no longer exists.
    async fn replace(&self, todo: Todo) -> StoreResult<Option<Todo>>;

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> StoreResult<bool>;
}

pub async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn TodoStore>> {
    if let Some(database) = cfg.database.as_ref() {
        let db = connection::connect(database).await?;
        let store = DatabaseTodoStore::new(&db);
        info!(backend = store.backend(), "todo store ready");
        return Ok(Arc::new(store));
    }

    let store = match cfg.storage.snapshot_path.as_ref() {
        Some(path) => MemoryTodoStore::with_snapshot(path).await?,
        None => {
            warn!("no database or snapshot configured; todos will not survive a restart");
            MemoryTodoStore::new()
        }
    };
    info!(backend = store.backend(), "todo store ready");
    Ok(Arc::new(store))
}
