use crate::config::DatabaseConfig;
use crate::store::models::{ProjectRow, ProjectRowList, TaskRow, TaskRowList};
use crate::store::{Repository, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracker_shared::{Project, ProjectChanges, Task, TaskChanges};
use uuid::Uuid;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS projects (
    id VARCHAR(36) NOT NULL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description VARCHAR(255)
)",
    "CREATE TABLE IF NOT EXISTS tasks (
    id VARCHAR(36) NOT NULL PRIMARY KEY,
    project_id VARCHAR(36) NOT NULL REFERENCES projects (id),
    name VARCHAR(255) NOT NULL,
    description VARCHAR(255),
    completed BOOLEAN NOT NULL DEFAULT 0
)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks (project_id)",
];

const INSERT_PROJECT: &str = "INSERT INTO projects (id, name, description) VALUES (?, ?, ?)
RETURNING id, name, description";
const SELECT_PROJECTS: &str = "SELECT id, name, description FROM projects ORDER BY rowid";
const SELECT_PROJECT: &str = "SELECT id, name, description FROM projects WHERE id = ?";
const UPDATE_PROJECT: &str = "UPDATE projects SET name = ?, description = ? WHERE id = ?
RETURNING id, name, description";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = ?";

const INSERT_TASK: &str =
    "INSERT INTO tasks (id, project_id, name, description, completed) VALUES (?, ?, ?, ?, ?)
RETURNING id, project_id, name, description, completed";
const SELECT_TASKS: &str =
    "SELECT id, project_id, name, description, completed FROM tasks ORDER BY rowid";
const SELECT_TASKS_BY_PROJECT: &str =
    "SELECT id, project_id, name, description, completed FROM tasks WHERE project_id = ? ORDER BY rowid";
const SELECT_TASK: &str =
    "SELECT id, project_id, name, description, completed FROM tasks WHERE id = ?";
const UPDATE_TASK: &str = "UPDATE tasks SET name = ?, description = ?, completed = ? WHERE id = ?
RETURNING id, project_id, name, description, completed";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        }
        .connect_with(options)
        .await?;

        tracing::debug!(url = %config.url, "connected to database");

        Ok(Self::new(pool))
    }

    pub async fn create_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Repository for SqliteStore {
    async fn insert_project(&self, project: &Project) -> Result<Project, StoreError> {
        sqlx::query_as::<_, ProjectRow>(INSERT_PROJECT)
            .bind(project.id.to_string())
            .bind(project.name.as_str())
            .bind(project.description.as_deref())
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }

    async fn select_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, ProjectRow>(SELECT_PROJECTS)
            .fetch_all(&self.pool)
            .await?;

        ProjectRowList(rows).try_into()
    }

    async fn select_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        sqlx::query_as::<_, ProjectRow>(SELECT_PROJECT)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, StoreError> {
        sqlx::query_as::<_, ProjectRow>(UPDATE_PROJECT)
            .bind(changes.name.as_str())
            .bind(changes.description.as_deref())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn delete_project(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_PROJECT)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        sqlx::query_as::<_, TaskRow>(INSERT_TASK)
            .bind(task.id.to_string())
            .bind(task.project_id.to_string())
            .bind(task.name.as_str())
            .bind(task.description.as_deref())
            .bind(task.completed)
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }

    async fn select_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(SELECT_TASKS)
            .fetch_all(&self.pool)
            .await?;

        TaskRowList(rows).try_into()
    }

    async fn select_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(SELECT_TASKS_BY_PROJECT)
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        TaskRowList(rows).try_into()
    }

    async fn select_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        sqlx::query_as::<_, TaskRow>(SELECT_TASK)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn update_task(
        &self,
        id: Uuid,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        sqlx::query_as::<_, TaskRow>(UPDATE_TASK)
            .bind(changes.name.as_str())
            .bind(changes.description.as_deref())
            .bind(changes.completed)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn delete_task(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_TASK)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
