//! Contracts for the collaborators the host application provides.

pub mod fs;
pub mod memory;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use fs::FsDocumentStore;
pub use memory::MemoryDocumentStore;

/// A document in the host's shared store, identified by its name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Host document store. Implementations must not treat `create` on an
/// existing name as success; callers check `exists` first.
pub trait DocumentStore: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool>;
    fn create(&self, name: &str, content: &str) -> Result<Document>;
    /// Brings the document to the foreground in the host workspace.
    fn open(&self, document: &Document) -> Result<()>;
}
