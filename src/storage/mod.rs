//! File-backed entity storage.
//!
//! # Responsibilities
//! - Define the store contract consumed by the CRUD handler
//! - Provide the directory-tree implementation (`<root>/<entity>/<id>`)
//!
//! # Design Decisions
//! - Plain create/read/write/delete/list; no caching, no locking — the
//!   handlers that use it are the unit of isolation
//! - Generated IDs are UUID v4

pub mod file_store;

pub use file_store::FileStore;

use std::io;
use std::path::Path;

/// Contract for a named-entity store.
///
/// Implementations must not panic; failures surface as `io::Error` and the
/// handlers translate them into response status codes.
pub trait EntityStore: Send + Sync {
    /// Create a new entity file and return its generated ID.
    fn create(&self, entity: &str) -> io::Result<String>;
    /// Read an entity's stored data.
    fn read(&self, entity: &str, id: &str) -> io::Result<String>;
    /// Overwrite an existing entity file. Fails if the file does not exist.
    fn write(&self, entity: &str, id: &str, data: &str) -> io::Result<()>;
    /// Create or overwrite an entity file at a caller-chosen ID, creating
    /// directories as needed.
    fn put(&self, entity: &str, id: &str, data: &str) -> io::Result<()>;
    /// Delete an entity file.
    fn delete(&self, entity: &str, id: &str) -> io::Result<()>;
    /// List the IDs stored under an entity type.
    fn list(&self, entity: &str) -> io::Result<Vec<String>>;
    /// Whether an entity file exists.
    fn exists(&self, entity: &str, id: &str) -> bool;
    /// The root directory this store writes under.
    fn data_root(&self) -> &Path;
}
