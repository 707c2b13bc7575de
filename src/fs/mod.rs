//! Filesystem access layer.
//!
//! Everything that touches the disk goes through this module first. It owns
//! the ordered set of served folders and the resolver that maps the
//! forward-slash paths used by the HTTP API onto host paths.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │   tree / view / upload / delivery services    │
//! └───────────────────────┬───────────────────────┘
//!                         │  "/data/a/readme.md"
//!                         ▼
//! ┌───────────────────────────────────────────────┐
//! │                 PathResolver                  │
//! │  slash → native, canonicalize, containment    │
//! └───────────────────────┬───────────────────────┘
//!                         │
//!                         ▼
//! ┌───────────────────────────────────────────────┐
//! │      FolderRoots (immutable after startup)    │
//! └───────────────────────────────────────────────┘
//! ```

mod resolver;
mod roots;

pub use resolver::{sanitize_relative, to_native, to_slash, PathResolver, ResolvedPath};
pub use roots::{FolderRoot, FolderRoots};
