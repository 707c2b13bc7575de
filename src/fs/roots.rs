//! Configured folder roots.
//!
//! The ordered list of roots is validated once at startup and never changes
//! afterwards. Each root is kept in two forms: the absolute path shown to
//! clients and the canonical path used for containment checks.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PathError;

use super::resolver::to_slash;

// =============================================================================
// FolderRoot
// =============================================================================

/// A single served directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRoot {
    /// Absolute path as configured (what clients see)
    path: PathBuf,

    /// Canonical path with symlinks and `..` resolved
    canonical: PathBuf,
}

impl FolderRoot {
    /// Validate a configured folder and build its root entry.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let path = path.as_ref();
        let label = path.display().to_string();

        let absolute = std::path::absolute(path).map_err(|e| PathError::from_io(&label, &e))?;
        let canonical = std::fs::canonicalize(&absolute).map_err(|e| PathError::from_io(&label, &e))?;

        if !canonical.is_dir() {
            return Err(PathError::NotADirectory { path: label });
        }

        debug!(path = %absolute.display(), canonical = %canonical.display(), "Folder root registered");

        Ok(Self {
            path: absolute,
            canonical,
        })
    }

    /// Absolute path of the root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical path of the root.
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Final path segment, used as the display name in the root listing.
    ///
    /// Filesystem roots such as `/` have no final segment; the full path is
    /// used instead.
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => to_slash(&self.path),
        }
    }

    /// Whether a canonical path lies inside this root (or is the root itself).
    pub fn contains(&self, canonical: &Path) -> bool {
        canonical.starts_with(&self.canonical)
    }
}

// =============================================================================
// FolderRoots
// =============================================================================

/// The ordered, immutable set of served folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRoots {
    roots: Vec<FolderRoot>,
}

impl FolderRoots {
    /// Build the root set from configured paths.
    ///
    /// Fails if the list is empty or any folder is missing or not a directory.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, PathError> {
        if paths.is_empty() {
            return Err(PathError::MissingParameter { name: "folders" });
        }

        let roots = paths
            .iter()
            .map(FolderRoot::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { roots })
    }

    /// Iterate over the roots in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &FolderRoot> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether a canonical path is a descendant of at least one root.
    pub fn contains(&self, canonical: &Path) -> bool {
        self.roots.iter().any(|root| root.contains(canonical))
    }
}

// =============================================================================
// Tests
// =============================================================================
