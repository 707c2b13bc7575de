//! Directory tree listing.
//!
//! Produces the entries the web client uses for navigation: either the
//! configured folder roots (the virtual root) or the immediate children of
//! one directory.

mod service;

pub use service::{EntryKind, TreeEntry, TreeService};
