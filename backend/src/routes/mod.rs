mod health;
mod projects;
mod tasks;

use crate::service::Service;
use axum::extract::{MatchedPath, Request};
use axum::http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the HTTP API. Collection routes answer with and without a trailing
/// slash.
pub fn router(service: Service, cors_hosts: &[String]) -> Router {
    let tasks = get(tasks::list_tasks).post(tasks::create_task);
    let projects = get(projects::list_projects).post(projects::create_project);

    Router::new()
        .route("/healthz", get(health::server_health))
        .route("/tasks", tasks.clone())
        .route("/tasks/", tasks)
        .route(
            "/tasks/:task_id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/projects", projects.clone())
        .route("/projects/", projects)
        .route(
            "/projects/:project_id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/projects/:project_id/tasks",
            get(projects::list_project_tasks),
        )
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &Request| {
                            let method = req.method();
                            let uri = req.uri();

                            let matched_path = req
                                .extensions()
                                .get::<MatchedPath>()
                                .map(|matched_path| matched_path.as_str());

                            tracing::debug_span!("request", %method, %uri, matched_path)
                        })
                        .on_failure(()),
                )
                .layer(cors(cors_hosts)),
        )
        .with_state(service)
}

fn cors(hosts: &[String]) -> CorsLayer {
    if hosts.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = hosts
        .iter()
        .filter_map(|host| match host.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(%host, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE])
        .allow_origin(origins)
}
