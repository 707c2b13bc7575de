//! # treeserve
//!
//! A single-process HTTP service that exposes local directory trees for
//! browsing, viewing, uploading and downloading through a small JSON API.
//!
//! ## Features
//!
//! - **Confined paths**: every client path is canonicalized and must stay inside a configured folder
//! - **Content classification**: text, markdown, image, pdf and binary views with a 50 MiB guard
//! - **Streaming uploads**: multipart parts are written to disk chunk by chunk, folder structure preserved
//! - **Downloads**: raw delivery with range support, or attachments with derived content types
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`fs`] - Folder roots and the path resolver
//! - [`view`] - Content classifier and file viewer
//! - [`tree`] - Directory listing
//! - [`upload`] - Streaming multipart ingestion
//! - [`delivery`] - Raw and attachment delivery
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use treeserve::{create_router, AppState, FolderRoots, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let roots = FolderRoots::from_paths(&["/data/a", "/data/b"]).unwrap();
//!     let router = create_router(AppState::new(Arc::new(roots)), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:30006").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod fs;
pub mod server;
pub mod tree;
pub mod upload;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use delivery::{DeliveryMode, DeliveryService};
pub use error::{FileError, PathError, UploadError};
pub use fs::{FolderRoot, FolderRoots, PathResolver, ResolvedPath};
pub use server::{create_router, AppState, ErrorResponse, RouterConfig, UploadResponse};
pub use tree::{EntryKind, TreeEntry, TreeService};
pub use upload::{UploadRequest, UploadService, UploadSummary};
pub use view::{classify, Classification, FileView, FileViewer, ViewKind};
