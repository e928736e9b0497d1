use anyhow::{bail, Context, Result};
use log::info;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use super::{Document, DocumentStore};

/// Document store backed by a directory of markdown files.
///
/// `open` has no editor to hand the file to, so it verifies the file and
/// remembers it as the most recently opened document.
pub struct FsDocumentStore {
    root: PathBuf,
    last_opened: Mutex<Option<PathBuf>>,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create notes directory {}", root.display()))?;
        Ok(Self {
            root,
            last_opened: Mutex::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn last_opened(&self) -> Option<PathBuf> {
        match self.last_opened.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let candidate = Path::new(name);
        if name.is_empty()
            || candidate.is_absolute()
            || candidate.components().count() != 1
        {
            bail!("invalid document name '{name}'");
        }
        Ok(self.root.join(candidate))
    }
}

impl DocumentStore for FsDocumentStore {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name)?.is_file())
    }

    fn create(&self, name: &str, content: &str) -> Result<Document> {
        let path = self.resolve(name)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Document::new(name))
    }

    fn open(&self, document: &Document) -> Result<()> {
        let path = self.resolve(&document.name)?;
        if !path.is_file() {
            bail!("{} does not exist", path.display());
        }
        info!("Opening document {}", path.display());
        let mut guard = match self.last_opened.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(path);
        Ok(())
    }
}
