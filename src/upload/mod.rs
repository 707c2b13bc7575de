//! Streaming upload ingestion.
//!
//! Multipart bodies are consumed one part at a time and each file part is
//! copied chunk by chunk straight to disk, so upload size is not bounded by
//! memory. The destination folder comes from the query string because it has
//! to be known before the first body byte is read.

mod service;

pub use service::{UploadRequest, UploadService, UploadSummary, UploadTarget, FILES_FIELD};
