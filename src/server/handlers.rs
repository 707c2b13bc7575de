//! HTTP request handlers for the file-serving API.
//!
//! # Endpoints
//!
//! - `GET /api/tree?path=` - List folder roots or a directory
//! - `GET /api/file?path=` - View payload for a file
//! - `GET /api/raw?path=` - Raw file bytes
//! - `GET /api/download?path=` - File bytes as an attachment
//! - `POST /api/upload?folder=&relativePath=` - Multipart upload
//! - `GET /health` - Health check

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::delivery::{DeliveryMode, DeliveryService};
use crate::error::{FileError, PathError, UploadError};
use crate::fs::{FolderRoots, PathResolver};
use crate::tree::{TreeEntry, TreeService};
use crate::upload::{UploadRequest, UploadService};
use crate::view::{FileView, FileViewer};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state handed to every handler.
///
/// All services share one immutable [`FolderRoots`]; nothing in here is
/// mutated after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub tree: TreeService,
    pub viewer: FileViewer,
    pub uploads: UploadService,
    pub delivery: DeliveryService,
}

impl AppState {
    /// Build every service over the given roots.
    pub fn new(roots: Arc<FolderRoots>) -> Self {
        let resolver = PathResolver::new(roots);
        Self {
            tree: TreeService::new(resolver.clone()),
            viewer: FileViewer::new(resolver.clone()),
            uploads: UploadService::new(resolver.clone()),
            delivery: DeliveryService::new(resolver),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for endpoints addressing a single path.
#[derive(Debug, Default, Deserialize)]
pub struct PathQuery {
    /// Forward-slash path; empty, "." or "/" is the virtual root for listings
    #[serde(default)]
    pub path: Option<String>,
}

/// Query parameters for uploads.
///
/// Both values come from the URL because the body is consumed as a single
/// forward-only stream.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Destination folder (required)
    #[serde(default)]
    pub folder: Option<String>,

    /// Overrides the stored file name, may include subdirectories
    #[serde(default, rename = "relativePath")]
    pub relative_path: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error kind (e.g., "not_found", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Result of an upload request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Stable error kind, present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl UploadResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            kind: None,
        }
    }

    pub fn failed(err: &UploadError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            kind: Some(err.kind().to_string()),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Status code for a path error on listing and view endpoints.
fn path_error_status(err: &PathError) -> StatusCode {
    match err {
        PathError::Forbidden { .. } => StatusCode::FORBIDDEN,
        PathError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        PathError::MissingParameter { .. }
        | PathError::NotFound { .. }
        | PathError::NotADirectory { .. }
        | PathError::NotAFile { .. }
        | PathError::InvalidRelativePath { .. } => StatusCode::BAD_REQUEST,
    }
}

/// Log an error response according to its severity.
fn log_error(status: StatusCode, error_type: &str, message: &str) {
    if status.is_server_error() {
        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );
    } else if status == StatusCode::FORBIDDEN {
        warn!(
            error_type = error_type,
            status = status.as_u16(),
            "Forbidden: {}",
            message
        );
    } else {
        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Client error: {}",
            message
        );
    }
}

fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    log_error(status, error_type, &message);
    let body = ErrorResponse::with_status(error_type, message, status);
    (status, Json(body)).into_response()
}

/// Convert FileError to HTTP response.
///
/// Listing and view endpoints report missing paths as 400.
impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        let status = match &self {
            FileError::Path(path_err) => path_error_status(path_err),
            FileError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.kind(), self.to_string())
    }
}

/// Wrapper for delivery errors, which report missing files as 404.
pub struct DeliveryError(pub FileError);

impl IntoResponse for DeliveryError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FileError::Path(PathError::NotFound { .. } | PathError::NotAFile { .. }) => {
                StatusCode::NOT_FOUND
            }
            FileError::Path(path_err) => path_error_status(path_err),
            FileError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.0.kind(), self.0.to_string())
    }
}

impl From<FileError> for DeliveryError {
    fn from(err: FileError) -> Self {
        DeliveryError(err)
    }
}

impl From<PathError> for DeliveryError {
    fn from(err: PathError) -> Self {
        DeliveryError(FileError::Path(err))
    }
}

/// Convert UploadError to an `{success: false}` response.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Path(path_err) => path_error_status(path_err),
            UploadError::NotMultipart(_) | UploadError::Stream(_) => StatusCode::BAD_REQUEST,
            UploadError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log_error(status, self.kind(), &self.to_string());
        (status, Json(UploadResponse::failed(&self))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tree listing requests.
///
/// # Endpoint
///
/// `GET /api/tree?path=<path>`
///
/// # Response
///
/// `200 OK` with a JSON array of `{name, type, path}` where `type` is
/// `"folder"` or `"file"`. An empty path, `.` or `/` lists the folder roots.
///
/// # Errors
///
/// - `400 Bad Request`: path does not exist or is not a directory
/// - `403 Forbidden`: path is outside the served folders
pub async fn tree_handler(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Vec<TreeEntry>>, FileError> {
    let path = query.path.unwrap_or_default();
    let entries = state.tree.list(&path).await?;
    Ok(Json(entries))
}

/// Handle file view requests.
///
/// # Endpoint
///
/// `GET /api/file?path=<path>`
///
/// # Response
///
/// `200 OK` with JSON body `{type, content, language?, mime?}`. Files over
/// the view limit still answer 200, with `type: "error"`.
///
/// # Errors
///
/// - `400 Bad Request`: missing path, path does not exist, or not a file
/// - `403 Forbidden`: path is outside the served folders
/// - `500 Internal Server Error`: read failure
pub async fn file_handler(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<FileView>, FileError> {
    let path = query.path.unwrap_or_default();
    let view = state.viewer.view(&path).await?;
    Ok(Json(view))
}

/// Handle raw file requests (`GET /api/raw?path=<path>`).
///
/// Uses default static-file handling, including range requests.
pub async fn raw_handler(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
    request: Request,
) -> Result<Response, DeliveryError> {
    deliver(state, query, DeliveryMode::Raw, request).await
}

/// Handle download requests (`GET /api/download?path=<path>`).
///
/// Responds with `Content-Disposition: attachment` and a content type derived
/// from the extension.
pub async fn download_handler(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
    request: Request,
) -> Result<Response, DeliveryError> {
    deliver(state, query, DeliveryMode::Attachment, request).await
}

async fn deliver(
    state: AppState,
    query: PathQuery,
    mode: DeliveryMode,
    request: Request,
) -> Result<Response, DeliveryError> {
    let path = match query.path {
        Some(path) if !path.is_empty() => path,
        _ => return Err(PathError::MissingParameter { name: "path" }.into()),
    };
    let response = state.delivery.deliver(&path, mode, request).await?;
    Ok(response)
}

/// Handle upload requests.
///
/// # Endpoint
///
/// `POST /api/upload?folder=<folder>&relativePath=<relative>`
///
/// The body is `multipart/form-data`; every part named `files` with a file
/// name is written under `folder`. `relativePath`, when given, replaces the
/// file name of every part in the request.
///
/// # Response
///
/// `{"success": true}` on success, otherwise
/// `{"success": false, "error": "<message>", "kind": "<kind>"}` with a 4xx or
/// 5xx status.
pub async fn upload_handler(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let folder = match query.folder {
        Some(folder) if !folder.is_empty() => folder,
        _ => return Err(PathError::MissingParameter { name: "folder" }.into()),
    };
    let mut multipart = multipart.map_err(|e| UploadError::NotMultipart(e.body_text()))?;

    let mut request = UploadRequest::new(folder);
    if let Some(relative_path) = query.relative_path.filter(|p| !p.is_empty()) {
        request = request.with_relative_path(relative_path);
    }

    state.uploads.ingest(&request, &mut multipart).await?;
    Ok(Json(UploadResponse::ok()))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
