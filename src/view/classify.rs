//! Content classification for the file viewer.
//!
//! Classification never touches the disk: it looks only at the path's
//! extension, the file size, and up to [`SNIFF_LEN`] leading bytes.

use std::path::Path;

use mime_guess::mime;

// =============================================================================
// Limits
// =============================================================================

/// Files larger than this are never read for viewing (50 MiB).
pub const MAX_VIEW_SIZE: u64 = 50 * 1024 * 1024;

/// Text files are truncated after this many bytes (1 MiB).
pub const MAX_TEXT_READ: u64 = 1024 * 1024;

/// Number of leading bytes inspected by the binary sniff.
pub const SNIFF_LEN: usize = 800;

// =============================================================================
// Classification
// =============================================================================

/// How the viewer should present a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Larger than [`MAX_VIEW_SIZE`]
    Oversize,

    /// PDF document, rendered by the client from the raw endpoint
    Pdf,

    /// Markdown source, rendered client-side
    Markdown,

    /// Binary image that can be inlined as a data URI
    Image { mime: String },

    /// Any other binary content
    Binary,

    /// Plain text with a syntax-highlighting hint (may be empty)
    Text { language: &'static str },
}

/// Classify a file from its path, size, and leading bytes.
///
/// The first matching rule wins:
/// 1. oversize guard
/// 2. `.pdf` extension
/// 3. `.md` / `.markdown` extension
/// 4. binary sniff with an `image/*` extension
/// 5. binary sniff
/// 6. text
pub fn classify(path: &Path, size: u64, head: &[u8]) -> Classification {
    if size > MAX_VIEW_SIZE {
        return Classification::Oversize;
    }

    let ext = extension_of(path);

    match ext.as_str() {
        "pdf" => return Classification::Pdf,
        "md" | "markdown" => return Classification::Markdown,
        _ => {}
    }

    if is_binary(head) {
        return match image_mime(&ext) {
            Some(mime) => Classification::Image { mime },
            None => Classification::Binary,
        };
    }

    Classification::Text {
        language: language_for_extension(&ext),
    }
}

/// Binary sniff over the first [`SNIFF_LEN`] bytes.
///
/// A NUL byte, or any control byte below 0x20 other than tab, LF, VT, FF and
/// CR (0x09..=0x0D), marks the content as binary.
pub fn is_binary(head: &[u8]) -> bool {
    head.iter()
        .take(SNIFF_LEN)
        .any(|&b| b < 0x09 || (b > 0x0D && b < 0x20))
}

/// Map a lowercase extension (without the dot) to a highlight.js language.
///
/// Unknown extensions map to the empty string.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext {
        "go" => "go",
        "js" => "javascript",
        "py" => "python",
        "java" => "java",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "md" => "markdown",
        _ => "",
    }
}

/// Lowercase extension of a path, or the empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// The `image/*` MIME type for an extension, if it has one.
fn image_mime(ext: &str) -> Option<String> {
    if ext.is_empty() {
        return None;
    }
    mime_guess::from_ext(ext)
        .first()
        .filter(|m| m.type_() == mime::IMAGE)
        .map(|m| m.essence_str().to_string())
}

// =============================================================================
// Tests
// =============================================================================
