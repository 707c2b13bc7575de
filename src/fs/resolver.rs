//! Path resolution and normalization.
//!
//! Paths cross the HTTP boundary in forward-slash form. Before any filesystem
//! call they are converted to the host separator, canonicalized, and checked
//! against the configured roots. A path that canonicalizes outside every root
//! (through `..` segments or a symlink) is rejected as forbidden.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::PathError;

use super::roots::FolderRoots;

// =============================================================================
// Separator Conversion
// =============================================================================

/// Convert a forward-slash API path to the host's native form.
pub fn to_native(raw: &str) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('/', MAIN_SEPARATOR_STR))
    }
}

/// Convert a host path to the forward-slash form used by the API.
pub fn to_slash(path: &Path) -> String {
    let lossy = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        lossy.into_owned()
    } else {
        lossy.replace(MAIN_SEPARATOR, "/")
    }
}

/// Turn an upload's relative file path into a safe relative `PathBuf`.
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped,
/// so a leading slash cannot make the result absolute. Any `..` segment or
/// platform prefix is rejected.
pub fn sanitize_relative(raw: &str) -> Result<PathBuf, PathError> {
    let invalid = || PathError::InvalidRelativePath {
        path: raw.to_string(),
    };

    let mut out = PathBuf::new();
    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid()),
            name => {
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => out.push(name),
                    _ => return Err(invalid()),
                }
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(out)
}

// =============================================================================
// ResolvedPath
// =============================================================================

/// A client path that has been validated against the folder roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The client's path in native form, used when echoing paths back
    display: PathBuf,

    /// Canonical location on disk, used for all filesystem operations
    canonical: PathBuf,
}

impl ResolvedPath {
    pub fn display(&self) -> &Path {
        &self.display
    }

    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// The client-facing path in forward-slash form.
    pub fn to_slash(&self) -> String {
        to_slash(&self.display)
    }
}

// =============================================================================
// PathResolver
// =============================================================================

/// Maps API paths onto filesystem paths confined to the folder roots.
///
/// Cheap to clone; all clones share the same immutable root set.
#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: Arc<FolderRoots>,
}

impl PathResolver {
    pub fn new(roots: Arc<FolderRoots>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &FolderRoots {
        &self.roots
    }

    /// Whether a raw API path denotes the virtual root (the list of folders).
    ///
    /// Callers must check this before calling [`resolve`](Self::resolve).
    pub fn is_virtual_root(raw: &str) -> bool {
        raw.is_empty() || raw == "." || raw == "/" || raw == MAIN_SEPARATOR_STR
    }

    /// Resolve a raw API path to a path inside one of the roots.
    ///
    /// # Errors
    ///
    /// - `MissingParameter` if `raw` is empty
    /// - `NotFound` if the path does not exist
    /// - `Forbidden` if it canonicalizes outside every root
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedPath, PathError> {
        if raw.is_empty() {
            return Err(PathError::MissingParameter { name: "path" });
        }

        let display = to_native(raw);
        let canonical = tokio::fs::canonicalize(&display)
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;

        if !self.roots.contains(&canonical) {
            warn!(path = raw, canonical = %canonical.display(), "Rejected path outside folder roots");
            return Err(PathError::Forbidden {
                path: raw.to_string(),
            });
        }

        debug!(path = raw, canonical = %canonical.display(), "Resolved path");
        Ok(ResolvedPath { display, canonical })
    }

    /// Resolve a path that must be a directory.
    pub async fn resolve_directory(&self, raw: &str) -> Result<ResolvedPath, PathError> {
        let resolved = self.resolve(raw).await?;
        let metadata = tokio::fs::metadata(resolved.canonical())
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;

        if !metadata.is_dir() {
            return Err(PathError::NotADirectory {
                path: raw.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve a path that must be a regular file.
    pub async fn resolve_file(&self, raw: &str) -> Result<ResolvedPath, PathError> {
        let resolved = self.resolve(raw).await?;
        let metadata = tokio::fs::metadata(resolved.canonical())
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;

        if !metadata.is_file() {
            return Err(PathError::NotAFile {
                path: raw.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Canonicalize an existing path and require it to lie inside the roots.
    async fn contained(&self, path: &Path) -> Result<PathBuf, PathError> {
        let label = to_slash(path);
        let canonical = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| PathError::from_io(&label, &e))?;

        if !self.roots.contains(&canonical) {
            warn!(path = %label, canonical = %canonical.display(), "Rejected write outside folder roots");
            return Err(PathError::Forbidden { path: label });
        }
        Ok(canonical)
    }

    /// Prepare the location an upload writes to, creating missing
    /// directories under `destination` one level at a time.
    ///
    /// Each existing component is canonicalized and checked against the
    /// roots before anything is created beneath it. An existing final
    /// component that is a symlink must point at a location inside the
    /// roots; a dangling one is refused.
    ///
    /// Returns the path to open for writing.
    pub async fn prepare_write(
        &self,
        destination: &Path,
        relative: &Path,
    ) -> Result<PathBuf, PathError> {
        let file_name = relative
            .file_name()
            .ok_or_else(|| PathError::InvalidRelativePath {
                path: to_slash(relative),
            })?;

        let mut current = self.contained(destination).await?;

        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                let next = current.join(component);
                match tokio::fs::symlink_metadata(&next).await {
                    Ok(_) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        match tokio::fs::create_dir(&next).await {
                            Ok(()) => debug!(path = %next.display(), "Created upload directory"),
                            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                            Err(e) => return Err(PathError::from_io(to_slash(&next), &e)),
                        }
                    }
                    Err(e) => return Err(PathError::from_io(to_slash(&next), &e)),
                }

                current = self.contained(&next).await?;
                let metadata = tokio::fs::metadata(&current)
                    .await
                    .map_err(|e| PathError::from_io(to_slash(&next), &e))?;
                if !metadata.is_dir() {
                    return Err(PathError::NotADirectory {
                        path: to_slash(&next),
                    });
                }
            }
        }

        let target = current.join(file_name);
        match tokio::fs::symlink_metadata(&target).await {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let label = to_slash(&target);
                match tokio::fs::canonicalize(&target).await {
                    Ok(canonical) if self.roots.contains(&canonical) => Ok(canonical),
                    _ => {
                        warn!(path = %label, "Rejected upload over a symlink leaving the folder roots");
                        Err(PathError::Forbidden { path: label })
                    }
                }
            }
            Ok(_) => Ok(target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(target),
            Err(e) => Err(PathError::from_io(to_slash(&target), &e)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
