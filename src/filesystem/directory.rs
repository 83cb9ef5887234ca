//! Directory emulation with placeholder objects
//!
//! A directory is made visible by a zero-length object at its key (the path
//! plus a trailing separator). Listing works on the key prefix, so children
//! show up whether or not the placeholder exists.

use crate::error::{ErrorKind, Result};
use crate::key;
use crate::path;
use crate::traits::{Connect, DirectoryHandle, Fetch, ObjectStore};
use crate::translate::Access;
use tracing::debug;

use super::ObjectFileSystem;

impl<C: Connect, F: Fetch> ObjectFileSystem<C, F> {
    /// Child paths of the directory at `path`
    ///
    /// A prefix listing can return the queried prefix itself (its
    /// placeholder); that entry is skipped.
    pub(crate) async fn list_directory(&self, path: &str) -> Result<Vec<String>> {
        self.require_directories(path, ErrorKind::NotReadable)?;
        let store = self.store().await?;
        let prefix = self.key(path, true);
        let listing = store
            .list_all(&prefix)
            .await
            .map_err(|e| self.error(path, e, Access::Read))?;

        let dirs = listing
            .prefixes
            .iter()
            .filter(|p| **p != prefix)
            .filter_map(|p| key::child_name(p, true));
        let files = listing
            .items
            .iter()
            .filter(|item| **item != prefix)
            .filter_map(|item| key::child_name(item, false));

        let children: Vec<String> = dirs
            .chain(files)
            .map(|name| path::join(path, name))
            .collect();
        debug!("Listed {} children under {}", children.len(), prefix);
        Ok(children)
    }

    /// Upload the placeholder of the directory at `path` (idempotent)
    pub(crate) async fn make_directory(&self, path: &str) -> Result<()> {
        self.require_directories(path, ErrorKind::NoModificationAllowed)?;
        let store = self.store().await?;
        let key = self.key(path, true);
        debug!("Creating directory placeholder {}", key);
        store
            .upload_empty(&key)
            .await
            .map_err(|e| self.error(path, e, Access::Write))
    }

    /// Delete the placeholder of the directory at `path`
    pub(crate) async fn remove_directory(&self, path: &str) -> Result<()> {
        self.require_directories(path, ErrorKind::NoModificationAllowed)?;
        if path::is_root(path) {
            return Err(self.fail(
                ErrorKind::NoModificationAllowed,
                path,
                "cannot remove the repository root",
            ));
        }
        let store = self.store().await?;
        let key = self.key(path, true);
        debug!("Deleting directory placeholder {}", key);
        store
            .delete_object(&key)
            .await
            .map_err(|e| self.error(path, e, Access::Write))
    }

    /// Fail with `kind` when directory emulation is disabled
    fn require_directories(&self, path: &str, kind: ErrorKind) -> Result<()> {
        if self.options().capabilities().directories {
            Ok(())
        } else {
            Err(self.fail(kind, path, "directories are not supported"))
        }
    }
}

/// A directory path bound to an [`ObjectFileSystem`]
pub struct ObjectDirectory<C: Connect, F: Fetch> {
    fs: ObjectFileSystem<C, F>,
    path: String,
}

impl<C: Connect, F: Fetch> ObjectDirectory<C, F> {
    pub(crate) const fn new(fs: ObjectFileSystem<C, F>, path: String) -> Self {
        Self { fs, path }
    }

    /// Key of this directory's placeholder object
    #[must_use]
    pub fn key(&self) -> String {
        self.fs.key(&self.path, true)
    }
}

impl<C: Connect, F: Fetch> DirectoryHandle for ObjectDirectory<C, F> {
    fn path(&self) -> &str {
        &self.path
    }

    async fn list(&self) -> Result<Vec<String>> {
        self.fs.list_directory(&self.path).await
    }

    async fn mkdir(&self) -> Result<()> {
        self.fs.make_directory(&self.path).await
    }

    async fn rmdir(&self) -> Result<()> {
        self.fs.remove_directory(&self.path).await
    }
}
