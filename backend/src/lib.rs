pub mod config;
pub mod errors;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use routes::router;
pub use service::{Service, ServiceError};
