// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    generate_handler, health_handler, metrics_handler, ping_handler, root_handler,
    upload_handler, upload_ref_handler,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::ModelTransport;
use crate::generation::GenerationPipeline;
use crate::imaging::DimensionGate;
use crate::storage::{ContentStore, DirectoryStore, Persister};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub transport: Arc<dyn ModelTransport>,
    pub store: Arc<dyn ContentStore>,
    pub pipeline: GenerationPipeline,
}

impl AppState {
    /// Wire the store, persister and pipeline around a transport.
    pub fn new(config: AppConfig, transport: Arc<dyn ModelTransport>) -> Result<Self> {
        let store: Arc<dyn ContentStore> =
            Arc::new(DirectoryStore::open(&config.storage.uploads_dir)?);
        let pipeline = GenerationPipeline::new(
            transport.clone(),
            Persister::new(store.clone()),
            DimensionGate::from(config.limits),
            config.gemini.model.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            transport,
            store,
            pipeline,
        })
    }
}

pub fn create_router(config: AppConfig, transport: Arc<dyn ModelTransport>) -> Result<Router> {
    let body_limit = config.server.body_limit_bytes;
    let serve_files = config.storage.serve_files;
    let uploads_dir = config.storage.uploads_dir.clone();

    let state = AppState::new(config, transport)?;
    let (set_request_id, propagate_request_id) = request_id_layers();

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/ping", get(ping_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/upload-ref", post(upload_ref_handler))
        .route("/api/generate", post(generate_handler));

    if serve_files {
        app = app.nest_service("/uploads", ServeDir::new(uploads_dir));
    }

    let app = app
        // Photos arrive as multipart uploads; lift axum's 2MB default
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(propagate_request_id)
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state);

    Ok(app)
}
