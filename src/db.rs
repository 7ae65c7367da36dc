//! Storage module for request state.
//!
//! Lyrics go to files on disk, handler records stay in memory.

pub use crate::registry::HandlerRegistry;
pub use crate::storage::ArtifactStore;
