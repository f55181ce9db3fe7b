use crate::errors::AppError;
use crate::service::Service;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tracker_shared::validate;
use tracker_shared::{DeleteResponse, EntityKind, Project, Task};

pub async fn list_projects(
    State(service): State<Service>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(service.list_projects().await?))
}

pub async fn create_project(
    State(service): State<Service>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Project>, AppError> {
    let Json(payload) = payload?;

    Ok(Json(service.create_project(&payload).await?))
}

pub async fn get_project(
    State(service): State<Service>,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let id = validate::identifier("project_id", &project_id)?;

    Ok(Json(service.get_project(id).await?))
}

pub async fn update_project(
    State(service): State<Service>,
    Path(project_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Project>, AppError> {
    let id = validate::identifier("project_id", &project_id)?;
    let Json(payload) = payload?;

    Ok(Json(service.update_project(id, &payload).await?))
}

pub async fn delete_project(
    State(service): State<Service>,
    Path(project_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = validate::identifier("project_id", &project_id)?;
    service.delete_project(id).await?;

    Ok(Json(DeleteResponse::new(EntityKind::Project)))
}

pub async fn list_project_tasks(
    State(service): State<Service>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    let id = validate::identifier("project_id", &project_id)?;

    Ok(Json(service.list_project_tasks(id).await?))
}
