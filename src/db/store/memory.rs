use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore};
use crate::todos::Todo;

/// In-process store. With a snapshot path, the full record set is loaded on
/// startup and rewritten after every mutation; a failed write rolls the
/// mutation back.
pub struct MemoryTodoStore {
    records: RwLock<HashMap<Uuid, Todo>>,
    snapshot: Option<PathBuf>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    pub async fn with_snapshot(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| snapshot_io(parent, source))?;
        }

        let records: HashMap<Uuid, Todo> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Todo>>(&bytes)?
                .into_iter()
                .map(|todo| (todo.id, todo))
                .collect(),
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(snapshot_io(&path, source)),
        };

        info!(
            path = %path.display(),
            records = records.len(),
            "loaded todo snapshot"
        );
        Ok(Self {
            records: RwLock::new(records),
            snapshot: Some(path),
        })
    }

    async fn persist(&self, records: &HashMap<Uuid, Todo>) -> StoreResult<()> {
        let Some(path) = self.snapshot.as_ref() else {
            return Ok(());
        };

        let mut todos: Vec<&Todo> = records.values().collect();
        todos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let bytes = serde_json::to_vec_pretty(&todos)?;

        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|source| snapshot_io(&staging, source))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|source| snapshot_io(path, source))
    }
}

impl Default for MemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn backend(&self) -> &'static str {
        if self.snapshot.is_some() {
            "memory+snapshot"
        } else {
            "memory"
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Todo>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|todo| todo.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, todo: Todo) -> StoreResult<Todo> {
        let mut records = self.records.write().await;
        records.insert(todo.id, todo.clone());
        if let Err(err) = self.persist(&records).await {
            records.remove(&todo.id);
            return Err(err);
        }
        Ok(todo)
    }

    async fn replace(&self, todo: Todo) -> StoreResult<Option<Todo>> {
        let mut records = self.records.write().await;
        let Some(previous) = records.insert(todo.id, todo.clone()) else {
            records.remove(&todo.id);
            return Ok(None);
        };
        if let Err(err) = self.persist(&records).await {
            records.insert(previous.id, previous);
            return Err(err);
        }
        Ok(Some(todo))
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        if !records.get(&id).is_some_and(|todo| todo.is_owned_by(owner_id)) {
            return Ok(false);
        }
        let Some(removed) = records.remove(&id) else {
            return Ok(false);
        };
        if let Err(err) = self.persist(&records).await {
            records.insert(removed.id, removed);
            return Err(err);
        }
        Ok(true)
    }
}

fn snapshot_io(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    }
}
