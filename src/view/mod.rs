//! File viewing.
//!
//! This module decides how a file should be shown in the web client and
//! produces the JSON payload for it. Classification is a pure function of the
//! file's extension, size, and first bytes; [`FileViewer`] does the reading.
//!
//! # Decision Order
//!
//! ```text
//! size > 50 MiB ──────────────▶ error (too large, body never read)
//! *.pdf ──────────────────────▶ pdf (URL to /api/raw)
//! *.md / *.markdown ──────────▶ markdown (full text)
//! binary sniff + image/* mime ▶ image (base64 data URI)
//! binary sniff ───────────────▶ binary (placeholder)
//! otherwise ──────────────────▶ text (first 1 MiB + language hint)
//! ```

mod classify;
mod service;

pub use classify::{
    classify, is_binary, language_for_extension, Classification, SNIFF_LEN, MAX_TEXT_READ,
    MAX_VIEW_SIZE,
};
pub use service::{
    FileView, FileViewer, ViewKind, BINARY_PLACEHOLDER, OVERSIZE_MESSAGE, TRUNCATION_NOTICE,
};
