use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::TemplateError;
use super::format::DocumentFormat;
use super::service::ContractTemplateService;
use super::variable::{DetectedVariable, FillRequest};

/// Uploaded template as sent by the dashboard; `document` is base64.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub document: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillPayload {
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub document: String,
    #[serde(default)]
    pub values: FillRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub variables: Vec<DetectedVariable>,
}

/// Router builder exposing template scan and fill endpoints.
pub fn template_router(service: Arc<ContractTemplateService>) -> Router {
    Router::new()
        .route("/api/v1/templates/scan", post(scan_handler))
        .route("/api/v1/templates/fill", post(fill_handler))
        .with_state(service)
}

pub(crate) async fn scan_handler(
    State(service): State<Arc<ContractTemplateService>>,
    Json(payload): Json<ScanPayload>,
) -> Response {
    let (format, bytes) =
        match decode_upload(payload.file_type, payload.file_name, &payload.document) {
            Ok(upload) => upload,
            Err(response) => return response,
        };

    let outcome = tokio::task::spawn_blocking(move || service.scan(&bytes, format)).await;
    match outcome {
        Ok(Ok(variables)) => (StatusCode::OK, Json(ScanResponse { variables })).into_response(),
        Ok(Err(error)) => template_error_response(&error),
        Err(join_error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, join_error.to_string()),
    }
}

pub(crate) async fn fill_handler(
    State(service): State<Arc<ContractTemplateService>>,
    Json(payload): Json<FillPayload>,
) -> Response {
    let FillPayload {
        file_type,
        file_name,
        document,
        values,
    } = payload;
    let (format, bytes) = match decode_upload(file_type, file_name, &document) {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let outcome =
        tokio::task::spawn_blocking(move || service.fill(&bytes, format, &values)).await;
    match outcome {
        Ok(Ok(filled)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, format.mime_type())],
            filled,
        )
            .into_response(),
        Ok(Err(error)) => template_error_response(&error),
        Err(join_error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, join_error.to_string()),
    }
}

fn decode_upload(
    file_type: Option<String>,
    file_name: Option<String>,
    document: &str,
) -> Result<(DocumentFormat, Vec<u8>), Response> {
    let format = resolve_format(file_type.as_deref(), file_name.as_deref())
        .map_err(|error| template_error_response(&error))?;
    let bytes = STANDARD.decode(document.trim()).map_err(|error| {
        error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("document is not valid base64: {error}"),
        )
    })?;
    Ok((format, bytes))
}

/// Explicit file type wins over the file name extension.
pub fn resolve_format(
    file_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<DocumentFormat, TemplateError> {
    match (file_type, file_name) {
        (Some(file_type), _) => file_type.parse(),
        (None, Some(file_name)) => DocumentFormat::from_file_name(file_name),
        (None, None) => Err(TemplateError::UnsupportedFormat(String::new())),
    }
}

pub(crate) fn template_error_status(error: &TemplateError) -> StatusCode {
    match error {
        TemplateError::DocumentTooLarge { .. } | TemplateError::PartTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        TemplateError::UnsupportedFormat(_)
        | TemplateError::FillNotSupported
        | TemplateError::CorruptArchive(_)
        | TemplateError::UnreadablePdf(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn template_error_response(error: &TemplateError) -> Response {
    error_response(template_error_status(error), error.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    let payload = json!({ "error": message });
    (status, Json(payload)).into_response()
}
