//! Router configuration for treeserve.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and, optionally, the static web client.
//!
//! # Route Structure
//!
//! ```text
//! /health          - Health check
//! /api/tree        - List roots or a directory
//! /api/file        - File view payload
//! /api/raw         - Raw file bytes
//! /api/download    - File as attachment
//! /api/upload      - Multipart upload (no body size limit)
//! /*               - Static web client (only with a static directory)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use treeserve::fs::FolderRoots;
//! use treeserve::server::{create_router, AppState, RouterConfig};
//!
//! let roots = Arc::new(FolderRoots::from_paths(&["/data/a", "/data/b"])?);
//! let router = create_router(AppState::new(roots), RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:30006").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{CONTENT_TYPE, RANGE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    download_handler, file_handler, health_handler, raw_handler, tree_handler, upload_handler,
    AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Directory holding the web client, served for unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    /// - No static client is served
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            static_dir: None,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Serve the web client from a directory.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The upload route has axum's default body limit disabled; every other
/// route keeps it.
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let cors = build_cors_layer(&config);

    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/api/tree", get(tree_handler))
        .route("/api/file", get(file_handler))
        .route("/api/raw", get(raw_handler))
        .route("/api/download", get(download_handler))
        .route(
            "/api/upload",
            post(upload_handler).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state);

    let router = match &config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    }
    .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, RANGE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
