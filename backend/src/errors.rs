use crate::service::ServiceError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracker_shared::validate::ValidationError;

#[derive(Serialize)]
pub struct AppErrorResponse {
    code: u16,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("request body was rejected")]
    Body(StatusCode, String),

    #[error("request was rejected")]
    Rejected(String),

    #[error("resource not found")]
    NotFound(Option<String>),

    #[error("request conflicts with stored data")]
    Conflict(String),

    #[error("internal server error")]
    InternalServerError,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(status, _) => *status,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            Self::NotFound(message) => message.clone(),
            Self::Body(_, message) | Self::Rejected(message) | Self::Conflict(message) => {
                Some(message.clone())
            }
            Self::InternalServerError => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = AppErrorResponse {
            code: status.as_u16(),
            status: self.to_string(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn internal_error<E>(err: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    tracing::error!("{:#}", anyhow::Error::from(err));

    AppError::InternalServerError
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Rejected(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Body(rejection.status(), rejection.body_text())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => err.into(),
            ServiceError::NotFound { .. } => AppError::NotFound(Some(err.to_string())),
            ServiceError::AlreadyExists { .. } | ServiceError::ProjectHasTasks(_) => {
                AppError::Conflict(err.to_string())
            }
            ServiceError::Storage(_) => internal_error(err),
        }
    }
}
