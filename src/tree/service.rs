use serde::Serialize;
use tracing::debug;

use crate::error::{FileError, PathError};
use crate::fs::{to_slash, PathResolver};

// =============================================================================
// TreeEntry
// =============================================================================

/// Kind of a listed entry.
///
/// Anything that is not a directory (regular files, symlinks, sockets, ...)
/// is reported as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One entry of a listing, with its path in forward-slash form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TreeEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    pub path: String,
}

// =============================================================================
// TreeService
// =============================================================================

/// Lists folder roots and directory contents.
#[derive(Debug, Clone)]
pub struct TreeService {
    resolver: PathResolver,
}

impl TreeService {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// List the entries under a raw API path.
    ///
    /// The virtual root (`""`, `"."`, `"/"`) lists the configured folders;
    /// any other path lists that directory's immediate children in
    /// filesystem enumeration order.
    pub async fn list(&self, raw: &str) -> Result<Vec<TreeEntry>, FileError> {
        if PathResolver::is_virtual_root(raw) {
            return Ok(self.list_roots());
        }
        self.list_directory(raw).await
    }

    /// One folder entry per configured root, in configured order.
    pub fn list_roots(&self) -> Vec<TreeEntry> {
        self.resolver
            .roots()
            .iter()
            .map(|root| TreeEntry {
                name: root.name(),
                kind: EntryKind::Folder,
                path: to_slash(root.path()),
            })
            .collect()
    }

    /// The immediate children of a directory inside the roots.
    pub async fn list_directory(&self, raw: &str) -> Result<Vec<TreeEntry>, FileError> {
        let dir = self.resolver.resolve_directory(raw).await?;

        let mut reader = tokio::fs::read_dir(dir.canonical())
            .await
            .map_err(|e| PathError::from_io(raw, &e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FileError::io(raw, e))?
        {
            let kind = match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => EntryKind::Folder,
                _ => EntryKind::File,
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = to_slash(&dir.display().join(&name));

            entries.push(TreeEntry { name, kind, path });
        }

        debug!(path = raw, count = entries.len(), "Listed directory");
        Ok(entries)
    }
}

// =============================================================================
// Tests
// =============================================================================
