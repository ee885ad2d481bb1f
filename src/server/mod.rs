//! Axum-based HTTP server for headshot-forge.
//!
//! Exposes the upload, generation and connectivity endpoints used by the
//! browser front-end, plus health, metrics and read-only access to stored
//! files.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints.
//! - `middleware`: Request ID and CORS layers.
//! - `routes`: Shared state and the router that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{GenerateRequest, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
