use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

pub async fn server_health() -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK".to_string(),
    };

    (StatusCode::OK, Json(response))
}
