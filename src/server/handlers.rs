// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{HeadshotError, Result};
use crate::generation::GenerationRequest;
use crate::imaging::ImageFormat;
use crate::prompt::GenerationMode;
use crate::storage::{load_asset, validate_name, NameSeed};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn root_handler() -> &'static str {
    "Hello from headshot-forge!"
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check configuration
    let config_check = if state.config.gemini.api_key.trim().is_empty() {
        overall_status = HealthStatus::Unhealthy;
        HealthCheck {
            status: "error".to_string(),
            message: "No Gemini API key configured".to_string(),
        }
    } else {
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "Model {} at {}",
                state.config.gemini.model, state.config.gemini.api_base_url
            ),
        }
    };
    checks.insert("configuration".to_string(), config_check);

    // Check the content store directory
    let uploads_dir = &state.config.storage.uploads_dir;
    let storage_check = match tokio::fs::metadata(uploads_dir).await {
        Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => HealthCheck {
            status: "ok".to_string(),
            message: format!("Content store at {}", uploads_dir),
        },
        Ok(_) => {
            if matches!(overall_status, HealthStatus::Healthy) {
                overall_status = HealthStatus::Degraded;
            }
            HealthCheck {
                status: "warning".to_string(),
                message: format!("{} is not a writable directory", uploads_dir),
            }
        }
        Err(e) => {
            overall_status = HealthStatus::Unhealthy;
            HealthCheck {
                status: "error".to_string(),
                message: format!("{}: {}", uploads_dir, e),
            }
        }
    };
    checks.insert("storage".to_string(), storage_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [("Content-Type", "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

/// Quick connectivity check to Gemini
pub async fn ping_handler(State(state): State<AppState>) -> Response {
    match state.transport.probe().await {
        Ok(report) => Json(json!({
            "ok": true,
            "status": report.status,
            "latencyMs": report.latency.as_millis() as u64,
        }))
        .into_response(),
        Err(e) => {
            warn!("Connectivity probe failed: {}", e);
            let error = match e {
                HeadshotError::Transport {
                    body: Some(body), ..
                } => body,
                other => json!(other.to_string()),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": error })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRefResponse {
    pub ref_id: String,
}

/// Subject photo upload (`photo` file field, optional `style` text field)
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let form = read_form(multipart, "photo").await?;
    let file = form
        .file
        .ok_or_else(|| HeadshotError::Validation("No file uploaded".to_string()))?;

    let job_id = store_upload(&state, "photo", file).await?;
    crate::metrics::record_upload("subject");

    let style = form.fields.get("style").cloned();
    info!("Stored subject upload {} (style={:?})", job_id, style);
    Ok(Json(UploadResponse { job_id, style }))
}

/// Reference photo upload (`ref` file field)
pub async fn upload_ref_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadRefResponse>> {
    let form = read_form(multipart, "ref").await?;
    let file = form
        .file
        .ok_or_else(|| HeadshotError::Validation("No reference file uploaded".to_string()))?;

    let ref_id = store_upload(&state, "ref", file).await?;
    crate::metrics::record_upload("reference");

    info!("Stored reference upload {}", ref_id);
    Ok(Json(UploadRefResponse { ref_id }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub job_id: Option<String>,
    pub style: Option<String>,
    pub prompt: Option<String>,
    pub ref_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub result: String,
}

/// Headshot generation endpoint
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let job_id = non_empty(req.job_id)
        .ok_or_else(|| HeadshotError::Validation("Missing jobId".to_string()))?;
    let ref_id = non_empty(req.ref_id);

    let mode = GenerationMode::select(
        req.style.as_deref(),
        req.prompt.as_deref(),
        ref_id.is_some(),
    )?;
    validate_name(&job_id)?;
    if let Some(ref_id) = &ref_id {
        validate_name(ref_id)?;
    }

    info!(
        "Received generate request: job={}, mode={}, ref={:?}",
        job_id,
        mode.label(),
        ref_id
    );

    let subject = load_asset(state.store.as_ref(), &job_id).await?;

    let reference = match &ref_id {
        Some(ref_id) => match load_asset(state.store.as_ref(), ref_id).await {
            Ok(asset) => Some(asset),
            // An unreadable reference degrades to subject-only
            Err(e @ (HeadshotError::NotFound(_) | HeadshotError::Io(_))) => {
                warn!("Reference image not available: {}", e);
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    let request = GenerationRequest {
        mode,
        subject,
        reference,
    };
    let report = state.pipeline.run(&request, NameSeed::now()).await?;

    Ok(Json(GenerateResponse {
        result: report.stored.name,
    }))
}

struct UploadedFile {
    file_name: Option<String>,
    bytes: bytes::Bytes,
}

struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

/// Collect one file field plus any text fields from a multipart body.
async fn read_form(mut multipart: Multipart, file_field: &str) -> Result<UploadForm> {
    let mut form = UploadForm {
        file: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HeadshotError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| HeadshotError::Validation(format!("Failed to read upload: {}", e)))?;
            form.file = Some(UploadedFile { file_name, bytes });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| HeadshotError::Validation(format!("Failed to read field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

async fn store_upload(state: &AppState, prefix: &str, file: UploadedFile) -> Result<String> {
    if file.bytes.is_empty() {
        return Err(HeadshotError::Validation("Uploaded file is empty".to_string()));
    }

    let extension = upload_extension(file.file_name.as_deref(), &file.bytes);
    let name = NameSeed::now().file_name(prefix, &extension);
    let size = state.store.put(&name, &file.bytes).await?;
    debug!("Wrote {} ({} bytes)", name, size);

    Ok(name)
}

/// Extension of the client's file name, or one sniffed from the bytes.
fn upload_extension(file_name: Option<&str>, bytes: &[u8]) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| ImageFormat::detect(bytes).extension().to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
