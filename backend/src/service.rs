use crate::store::{Repository, StoreError};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracker_shared::validate::{self, ValidationError};
use tracker_shared::{EntityKind, Project, Task};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: EntityKind, id: Uuid },

    #[error("project {0} still has tasks")]
    ProjectHasTasks(Uuid),

    #[error("storage failure")]
    Storage(#[from] StoreError),
}

/// Validation and persistence for projects and tasks.
///
/// Cloning is cheap; every clone shares the same store handle.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn Repository>,
}

impl Service {
    pub fn new<R: Repository>(store: R) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub async fn create_project(&self, payload: &Value) -> Result<Project, ServiceError> {
        let project = validate::project(payload)?;

        let created = self
            .store
            .insert_project(&project)
            .await
            .map_err(|err| match err {
                StoreError::OnConflict => ServiceError::AlreadyExists {
                    kind: EntityKind::Project,
                    id: project.id,
                },
                err => err.into(),
            })?;
        tracing::info!(project_id = %created.id, "created project");

        Ok(created)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let projects = self.store.select_projects().await?;
        tracing::debug!(count = projects.len(), "listed projects");

        Ok(projects)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, ServiceError> {
        self.store
            .select_project(id)
            .await?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Project,
                id,
            })
    }

    pub async fn update_project(&self, id: Uuid, payload: &Value) -> Result<Project, ServiceError> {
        let changes = validate::project_changes(payload)?;

        let updated = self
            .store
            .update_project(id, &changes)
            .await?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Project,
                id,
            })?;
        tracing::info!(project_id = %id, "updated project");

        Ok(updated)
    }

    /// Deleting an unknown project succeeds. A project that tasks still
    /// reference is kept.
    pub async fn delete_project(&self, id: Uuid) -> Result<(), ServiceError> {
        let removed = self
            .store
            .delete_project(id)
            .await
            .map_err(|err| match err {
                StoreError::ForeignKey => ServiceError::ProjectHasTasks(id),
                err => err.into(),
            })?;
        tracing::info!(project_id = %id, removed, "deleted project");

        Ok(())
    }

    pub async fn list_project_tasks(&self, id: Uuid) -> Result<Vec<Task>, ServiceError> {
        self.get_project(id).await?;

        Ok(self.store.select_tasks_by_project(id).await?)
    }

    pub async fn create_task(&self, payload: &Value) -> Result<Task, ServiceError> {
        let task = validate::task(payload)?;
        self.get_project(task.project_id).await?;

        // the project may be deleted between the check and the insert
        let created = self
            .store
            .insert_task(&task)
            .await
            .map_err(|err| match err {
                StoreError::OnConflict => ServiceError::AlreadyExists {
                    kind: EntityKind::Task,
                    id: task.id,
                },
                StoreError::ForeignKey => ServiceError::NotFound {
                    kind: EntityKind::Project,
                    id: task.project_id,
                },
                err => err.into(),
            })?;
        tracing::info!(task_id = %created.id, project_id = %created.project_id, "created task");

        Ok(created)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let tasks = self.store.select_tasks().await?;
        tracing::debug!(count = tasks.len(), "listed tasks");

        Ok(tasks)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, ServiceError> {
        self.store
            .select_task(id)
            .await?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Task,
                id,
            })
    }

    pub async fn update_task(&self, id: Uuid, payload: &Value) -> Result<Task, ServiceError> {
        let changes = validate::task_changes(payload)?;

        let updated = self
            .store
            .update_task(id, &changes)
            .await?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Task,
                id,
            })?;
        tracing::info!(task_id = %id, completed = updated.completed, "updated task");

        Ok(updated)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ServiceError> {
        let removed = self.store.delete_task(id).await?;
        tracing::info!(task_id = %id, removed, "deleted task");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory_store, SqliteStore};
    use serde_json::json;

    async fn service() -> (Service, SqliteStore) {
        let store = memory_store().await;

        (Service::new(store.clone()), store)
    }

    async fn project(service: &Service) -> Project {
        project_named(service, "Tracker").await
    }

    async fn project_named(service: &Service, name: &str) -> Project {
        service
            .create_project(&json!({ "name": name }))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_task_returns_input_fields() {
        let (service, _) = service().await;
        let project = project(&service).await;

        let task = service
            .create_task(&json!({ "project_id": project.id, "name": "Write spec" }))
            .await
            .unwrap();

        assert_eq!(task.project_id, project.id);
        assert_eq!(task.name, "Write spec");
        assert_eq!(task.description, None);
        assert!(!task.completed);
        assert_eq!(service.get_task(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_create_task_with_unknown_project() {
        let (service, _) = service().await;
        let missing = Uuid::new_v4();

        let result = service
            .create_task(&json!({ "project_id": missing, "name": "orphan" }))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::NotFound { kind: EntityKind::Project, id }) if id == missing
        ));
        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let (service, _) = service().await;

        let result = service.create_project(&json!({ "description": "nameless" })).await;

        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::MissingField("name")))
        ));
        assert!(service.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_existing_id() {
        let (service, _) = service().await;
        let project = project(&service).await;

        let result = service
            .create_project(&json!({ "id": project.id, "name": "Again" }))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::AlreadyExists { kind: EntityKind::Project, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_excludes_deleted() {
        let (service, _) = service().await;
        let project = project(&service).await;
        let mut created = Vec::new();
        for name in ["a", "b", "c"] {
            created.push(
                service
                    .create_task(&json!({ "project_id": project.id, "name": name }))
                    .await
                    .unwrap(),
            );
        }

        service.delete_task(created[1].id).await.unwrap();

        let listed = service.list_tasks().await.unwrap();
        assert_eq!(listed, vec![created[0].clone(), created[2].clone()]);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let (service, _) = service().await;
        let project = project(&service).await;
        let other = project_named(&service, "Other").await;
        let task = service
            .create_task(&json!({ "project_id": project.id, "name": "draft", "description": "v1" }))
            .await
            .unwrap();

        let updated = service
            .update_task(
                task.id,
                &json!({
                    "id": Uuid::new_v4(),
                    "project_id": other.id,
                    "name": "final",
                    "completed": true,
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.project_id, project.id);
        assert_eq!(updated.name, "final");
        assert_eq!(updated.description, None);
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_update_unknown_ids() {
        let (service, _) = service().await;
        let missing = Uuid::new_v4();

        let task = service.update_task(missing, &json!({ "name": "x" })).await;
        let project = service.update_project(missing, &json!({ "name": "x" })).await;

        assert!(matches!(
            task,
            Err(ServiceError::NotFound { kind: EntityKind::Task, .. })
        ));
        assert!(matches!(
            project,
            Err(ServiceError::NotFound { kind: EntityKind::Project, .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, _) = service().await;
        let project = project(&service).await;
        let task = service
            .create_task(&json!({ "project_id": project.id, "name": "x" }))
            .await
            .unwrap();

        service.delete_task(task.id).await.unwrap();
        service.delete_task(task.id).await.unwrap();
        service.delete_project(project.id).await.unwrap();
        service.delete_project(project.id).await.unwrap();

        assert!(service.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_project_with_tasks() {
        let (service, _) = service().await;
        let project = project(&service).await;
        service
            .create_task(&json!({ "project_id": project.id, "name": "x" }))
            .await
            .unwrap();

        let result = service.delete_project(project.id).await;

        assert!(matches!(result, Err(ServiceError::ProjectHasTasks(id)) if id == project.id));
        assert_eq!(service.get_project(project.id).await.unwrap(), project);
    }

    #[tokio::test]
    async fn test_list_project_tasks() {
        let (service, _) = service().await;
        let project = project(&service).await;
        let other = project_named(&service, "Other").await;
        let task = service
            .create_task(&json!({ "project_id": project.id, "name": "mine" }))
            .await
            .unwrap();
        service
            .create_task(&json!({ "project_id": other.id, "name": "theirs" }))
            .await
            .unwrap();

        assert_eq!(service.list_project_tasks(project.id).await.unwrap(), vec![task]);
        assert!(matches!(
            service.list_project_tasks(Uuid::new_v4()).await,
            Err(ServiceError::NotFound { kind: EntityKind::Project, .. })
        ));
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let (service, store) = service().await;
        store.close().await;

        let result = service.list_tasks().await;

        assert!(matches!(result, Err(ServiceError::Storage(_))));
    }
}
