use std::convert::Infallible;
use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info};

use crate::error::{FileError, PathError};
use crate::fs::{PathResolver, ResolvedPath};

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// How file bytes are handed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Default static-file handling, displayed inline
    Raw,

    /// Forced download with an explicit content type
    Attachment,
}

// =============================================================================
// Header Helpers
// =============================================================================

/// Content type for an attachment, derived from the file extension.
pub fn attachment_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// `Content-Disposition` value for downloading `file_name`.
///
/// Names made only of token characters are sent bare
/// (`attachment; filename=report.pdf`). Anything else is quoted with unsafe
/// characters replaced, plus an RFC 5987 `filename*` carrying the exact name.
pub fn content_disposition(file_name: &str) -> String {
    let is_token = !file_name.is_empty()
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&+-.^_`|~".contains(c));

    if is_token {
        return format!("attachment; filename={}", file_name);
    }

    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

// =============================================================================
// DeliveryService
// =============================================================================

/// Streams files inside the roots back to the client.
#[derive(Debug, Clone)]
pub struct DeliveryService {
    resolver: PathResolver,
}

impl DeliveryService {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Deliver the file at a raw API path.
    ///
    /// `request` is only consulted in raw mode, for conditional and range
    /// headers.
    ///
    /// # Errors
    ///
    /// Path errors when the file is missing, outside the roots, or not a
    /// regular file; `FileError::Io` if it cannot be opened.
    pub async fn deliver(
        &self,
        raw: &str,
        mode: DeliveryMode,
        request: Request,
    ) -> Result<Response, FileError> {
        let resolved = self.resolver.resolve_file(raw).await?;

        match mode {
            DeliveryMode::Raw => Ok(self.raw(raw, &resolved, request).await),
            DeliveryMode::Attachment => self.attachment(raw, &resolved).await,
        }
    }

    async fn raw(&self, raw: &str, resolved: &ResolvedPath, request: Request) -> Response {
        debug!(path = raw, "Serving raw file");

        let response = ServeFile::new(resolved.canonical())
            .oneshot(request)
            .await
            .unwrap_or_else(|never: Infallible| match never {});

        response.map(Body::new)
    }

    async fn attachment(&self, raw: &str, resolved: &ResolvedPath) -> Result<Response, FileError> {
        let file = File::open(resolved.canonical())
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| FileError::io(raw, e))?
            .len();

        let file_name = resolved
            .display()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = attachment_content_type(resolved.display());

        info!(path = raw, size, content_type = %content_type, "Download started");

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_DISPOSITION, content_disposition(&file_name))
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from_stream(ReaderStream::new(file)))
            .map_err(|e| FileError::Io {
                path: raw.to_string(),
                message: e.to_string(),
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
