//! HTTP server layer for treeserve.
//!
//! A thin facade: handlers parse query parameters, call the services, and
//! map their errors onto status codes and JSON bodies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     /api/tree  /api/file  /api/raw  /api/download  /api/upload  │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (params, error mapping)  │  │ (router, CORS, tracing)     │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    download_handler, file_handler, health_handler, raw_handler, tree_handler, upload_handler,
    AppState, DeliveryError, ErrorResponse, HealthResponse, PathQuery, UploadQuery, UploadResponse,
};
pub use routes::{create_router, RouterConfig};
