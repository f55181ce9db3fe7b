//! Row storage for projects and tasks.

mod error;
mod models;
mod sqlite;

pub use error::StoreError;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use tracker_shared::{Project, ProjectChanges, Task, TaskChanges};
use uuid::Uuid;

/// One method per single-row statement. Implementations hold a pool and
/// borrow a connection per call.
///
/// `update_*` returns `None` when no row has the given id. `delete_*` returns
/// the number of rows removed, which is zero for an unknown id.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    async fn insert_project(&self, project: &Project) -> Result<Project, StoreError>;
    async fn select_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn select_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, StoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError>;
    async fn select_tasks(&self) -> Result<Vec<Task>, StoreError>;
    async fn select_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn select_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn update_task(&self, id: Uuid, changes: &TaskChanges)
    -> Result<Option<Task>, StoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<u64, StoreError>;
}

#[cfg(test)]
pub(crate) async fn memory_store() -> SqliteStore {
    use crate::config::DatabaseConfig;

    let store = SqliteStore::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();
    store.create_schema().await.unwrap();

    store
}
