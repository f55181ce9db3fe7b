use crate::errors::AppError;
use crate::service::Service;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tracker_shared::validate;
use tracker_shared::{DeleteResponse, EntityKind, Task};

pub async fn list_tasks(State(service): State<Service>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service.list_tasks().await?))
}

pub async fn create_task(
    State(service): State<Service>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let Json(payload) = payload?;

    Ok(Json(service.create_task(&payload).await?))
}

pub async fn get_task(
    State(service): State<Service>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let id = validate::identifier("task_id", &task_id)?;

    Ok(Json(service.get_task(id).await?))
}

pub async fn update_task(
    State(service): State<Service>,
    Path(task_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let id = validate::identifier("task_id", &task_id)?;
    let Json(payload) = payload?;

    Ok(Json(service.update_task(id, &payload).await?))
}

pub async fn delete_task(
    State(service): State<Service>,
    Path(task_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = validate::identifier("task_id", &task_id)?;
    service.delete_task(id).await?;

    Ok(Json(DeleteResponse::new(EntityKind::Task)))
}
