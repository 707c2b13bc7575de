//! Upload service.
//!
//! # Failure Semantics
//!
//! The whole request is a single operation: the first error aborts it, later
//! parts are never read, and files already written (including a partially
//! written one) are left in place.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{PathError, UploadError};
use crate::fs::{sanitize_relative, to_slash, PathResolver};

/// Form-field name carrying uploaded files. Other fields are ignored.
pub const FILES_FIELD: &str = "files";

// =============================================================================
// Request Types
// =============================================================================

/// Out-of-band upload parameters taken from the request's query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Destination folder as a forward-slash API path
    pub folder: String,

    /// Overrides the file name of every part; may contain nested directories
    pub relative_path: Option<String>,
}

impl UploadRequest {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            relative_path: None,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// The file name a part is stored under: the relative-path hint when
    /// present, otherwise the part's declared file name.
    pub fn effective_name<'a>(&'a self, declared: &'a str) -> &'a str {
        match self.relative_path.as_deref() {
            Some(hint) if !hint.is_empty() => hint,
            _ => declared,
        }
    }
}

/// Where a single part is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    destination: PathBuf,
    relative: PathBuf,
}

impl UploadTarget {
    /// Build a target under `destination`, rejecting names that would leave it.
    pub fn new(destination: &Path, file_name: &str) -> Result<Self, PathError> {
        Ok(Self {
            destination: destination.to_path_buf(),
            relative: sanitize_relative(file_name)?,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }
}

/// Totals for a completed upload request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub files: usize,
    pub bytes: u64,
}

// =============================================================================
// UploadService
// =============================================================================

/// Writes multipart file parts into folders inside the roots.
#[derive(Debug, Clone)]
pub struct UploadService {
    resolver: PathResolver,
}

impl UploadService {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Consume a multipart body and store every `files` part.
    ///
    /// The destination folder is resolved once, before any part is read.
    /// Parts are handled strictly in stream order.
    pub async fn ingest(
        &self,
        request: &UploadRequest,
        multipart: &mut Multipart,
    ) -> Result<UploadSummary, UploadError> {
        let destination = self.resolver.resolve_directory(&request.folder).await?;
        let mut summary = UploadSummary::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::Stream(e.to_string()))?
        {
            if field.name() != Some(FILES_FIELD) {
                debug!(field = ?field.name(), "Skipping non-file form field");
                continue;
            }
            let declared = match field.file_name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    debug!("Skipping files part without a file name");
                    continue;
                }
            };

            let target = UploadTarget::new(
                destination.canonical(),
                request.effective_name(&declared),
            )?;
            summary.bytes += self.store(&target, field).await?;
            summary.files += 1;
        }

        info!(
            folder = %request.folder,
            files = summary.files,
            bytes = summary.bytes,
            "Upload complete"
        );
        Ok(summary)
    }

    /// Stream one part's bytes into its target file, creating parent
    /// directories as needed. Returns the number of bytes written.
    ///
    /// Containment is proven component by component before any directory
    /// is created, and the file itself is opened without following a
    /// symlink at its final component.
    pub async fn store<S, E>(&self, target: &UploadTarget, stream: S) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let path = self
            .resolver
            .prepare_write(target.destination(), target.relative())
            .await?;
        let label = to_slash(&path);

        let mut file = create_file(&path)
            .await
            .map_err(|e| UploadError::io(&label, e))?;

        let mut stream = std::pin::pin!(stream);
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| UploadError::io(&label, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| UploadError::io(&label, e))?;

        info!(path = %label, bytes = written, "Stored uploaded file");
        Ok(written)
    }
}

/// Open `path` for writing, truncating an existing file.
async fn create_file(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.custom_flags(nix::fcntl::OFlag::O_NOFOLLOW.bits());
    options.open(path).await
}

// =============================================================================
// Tests
// =============================================================================
