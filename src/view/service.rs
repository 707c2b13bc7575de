//! File viewer service.
//!
//! Opens a resolved file read-only, classifies it, and reads only as much of
//! the body as the classification needs. The handle is dropped on every exit
//! path, including early returns for oversize files and errors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

use crate::error::{FileError, PathError};
use crate::fs::PathResolver;

use super::classify::{classify, Classification, MAX_TEXT_READ, MAX_VIEW_SIZE, SNIFF_LEN};

/// Message returned instead of content for files over the view limit.
pub const OVERSIZE_MESSAGE: &str = "File is too large to view (over 50MB). Please download it.";

/// Placeholder returned for binary files that are not images.
pub const BINARY_PLACEHOLDER: &str = "[Binary file will not be displayed]";

/// Appended to text content cut off at the text read limit.
pub const TRUNCATION_NOTICE: &str = "\n\n... [File truncated because it is too large] ...";

/// Endpoint the client uses to fetch raw bytes for PDFs.
const RAW_ENDPOINT: &str = "/api/raw";

// =============================================================================
// FileView
// =============================================================================

/// Display kind reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Text,
    Markdown,
    Image,
    Pdf,
    Binary,
    Error,
}

/// JSON payload of the file-view endpoint.
///
/// `content` holds literal text, a data URI (images), a URL (pdf) or a
/// human-readable placeholder (binary, error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileView {
    #[serde(rename = "type")]
    pub kind: ViewKind,

    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileView {
    fn new(kind: ViewKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            language: None,
            mime: None,
        }
    }

    pub fn oversize() -> Self {
        Self::new(ViewKind::Error, OVERSIZE_MESSAGE)
    }

    pub fn pdf(api_path: &str) -> Self {
        Self::new(
            ViewKind::Pdf,
            format!("{}?path={}", RAW_ENDPOINT, urlencoding::encode(api_path)),
        )
    }

    pub fn markdown(content: String) -> Self {
        Self::new(ViewKind::Markdown, content)
    }

    pub fn image(mime: String, data: &[u8]) -> Self {
        let content = format!("data:{};base64,{}", mime, STANDARD.encode(data));
        Self {
            mime: Some(mime),
            ..Self::new(ViewKind::Image, content)
        }
    }

    pub fn binary() -> Self {
        Self {
            language: Some(String::new()),
            ..Self::new(ViewKind::Binary, BINARY_PLACEHOLDER)
        }
    }

    pub fn text(content: String, language: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            ..Self::new(ViewKind::Text, content)
        }
    }
}

// =============================================================================
// FileViewer
// =============================================================================

/// Produces [`FileView`]s for paths inside the folder roots.
#[derive(Debug, Clone)]
pub struct FileViewer {
    resolver: PathResolver,
}

impl FileViewer {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Build the view payload for a forward-slash API path.
    ///
    /// # Errors
    ///
    /// - path resolution errors (missing, outside the roots, not a file)
    /// - `FileError::Io` if reading fails after the file was opened
    pub async fn view(&self, raw: &str) -> Result<FileView, FileError> {
        let resolved = self.resolver.resolve_file(raw).await?;

        let mut file = File::open(resolved.canonical())
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| FileError::io(raw, e))?
            .len();

        if size > MAX_VIEW_SIZE {
            debug!(path = raw, size, "File too large to view");
            return Ok(FileView::oversize());
        }

        let head = read_limited(&mut file, SNIFF_LEN as u64)
            .await
            .map_err(|e| FileError::io(raw, e))?;
        let classification = classify(resolved.display(), size, &head);
        debug!(path = raw, size, ?classification, "Classified file");

        file.rewind().await.map_err(|e| FileError::io(raw, e))?;

        let view = match classification {
            Classification::Oversize => FileView::oversize(),
            Classification::Pdf => FileView::pdf(raw),
            Classification::Markdown => {
                let data = read_all(&mut file, size).await.map_err(|e| FileError::io(raw, e))?;
                FileView::markdown(String::from_utf8_lossy(&data).into_owned())
            }
            Classification::Image { mime } => {
                let data = read_all(&mut file, size).await.map_err(|e| FileError::io(raw, e))?;
                FileView::image(mime, &data)
            }
            Classification::Binary => FileView::binary(),
            Classification::Text { language } => {
                let data = read_limited(&mut file, MAX_TEXT_READ)
                    .await
                    .map_err(|e| FileError::io(raw, e))?;
                let mut content = String::from_utf8_lossy(&data).into_owned();
                if size > MAX_TEXT_READ {
                    content.push_str(TRUNCATION_NOTICE);
                }
                FileView::text(content, language)
            }
        };

        Ok(view)
    }
}

/// Read up to `limit` bytes from the current position.
async fn read_limited(file: &mut File, limit: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Read the remainder of the file.
async fn read_all(file: &mut File, size_hint: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(size_hint as usize);
    file.read_to_end(&mut buf).await?;
    Ok(buf)
}

// =============================================================================
// Tests
// =============================================================================
