use crate::store::StoreError;
use sqlx::FromRow;
use tracker_shared::{Project, Task};
use uuid::Uuid;

#[derive(FromRow, Clone, Debug)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(FromRow, Clone, Debug)]
pub struct TaskRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
}

fn parse_id(column: &str, value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|_| StoreError::InvalidRow(format!("{column} = {value:?}")))
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("projects.id", &row.id)?,
            name: row.name,
            description: row.description,
        })
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("tasks.id", &row.id)?,
            project_id: parse_id("tasks.project_id", &row.project_id)?,
            name: row.name,
            description: row.description,
            completed: row.completed,
        })
    }
}

pub struct ProjectRowList(pub Vec<ProjectRow>);

impl TryFrom<ProjectRowList> for Vec<Project> {
    type Error = StoreError;

    fn try_from(value: ProjectRowList) -> Result<Self, Self::Error> {
        value.0.into_iter().map(Project::try_from).collect()
    }
}

pub struct TaskRowList(pub Vec<TaskRow>);

impl TryFrom<TaskRowList> for Vec<Task> {
    type Error = StoreError;

    fn try_from(value: TaskRowList) -> Result<Self, Self::Error> {
        value.0.into_iter().map(Task::try_from).collect()
    }
}
