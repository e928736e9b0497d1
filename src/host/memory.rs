use anyhow::{anyhow, bail, Result};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use super::{Document, DocumentStore};

#[derive(Default)]
struct Inner {
    documents: BTreeMap<String, String>,
    opened: Vec<String>,
}

/// Document store kept entirely in memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn contents(&self, name: &str) -> Option<String> {
        self.inner().documents.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner().documents.is_empty()
    }

    /// Names passed to `open`, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.inner().opened.clone()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.inner().documents.contains_key(name))
    }

    fn create(&self, name: &str, content: &str) -> Result<Document> {
        let mut inner = self.inner();
        if inner.documents.contains_key(name) {
            bail!("document '{name}' already exists");
        }
        inner.documents.insert(name.to_string(), content.to_string());
        Ok(Document::new(name))
    }

    fn open(&self, document: &Document) -> Result<()> {
        let mut inner = self.inner();
        if !inner.documents.contains_key(&document.name) {
            return Err(anyhow!("document '{}' not found", document.name));
        }
        inner.opened.push(document.name.clone());
        Ok(())
    }
}
