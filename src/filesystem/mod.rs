//! Object-store filesystem adapter
//!
//! [`ObjectFileSystem`] implements the [`FileSystem`] contract on top of an
//! [`ObjectStore`]. Operations are split by concern:
//!
//! - `read`: downloads through the [`Fetch`] transfer
//! - `write`: uploads, append emulation and file deletion
//! - `metadata`: head, attribute patches and URL generation
//! - `directory`: placeholder-based directory emulation
//!
//! The store client is created lazily. The first operation provisions it:
//! the client is connected, and the repository root placeholder is created
//! if missing. Concurrent first operations share a single provisioning run.

pub mod directory;
pub mod file;
pub mod metadata;
pub mod read;
pub mod write;

pub use directory::ObjectDirectory;
pub use file::ObjectFile;

use crate::config::{self, Capabilities, FileSystemOptions};
use crate::error::{ErrorKind, FsError, Result};
use crate::key;
use crate::stats::{Attributes, Stats};
use crate::traits::{Connect, EntryKind, Fetch, FileSystem, HeadOptions, ObjectStore, UrlMethod};
use crate::translate::{self, Access};
use crate::{error::BackendError, path};
use futures::lock::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Lifecycle of the lazily created store client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProvisionState {
    Uninitialized = 0,
    Provisioning = 1,
    Ready = 2,
}

impl ProvisionState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Provisioning,
            2 => Self::Ready,
            _ => Self::Uninitialized,
        }
    }
}

/// Hierarchical filesystem over a flat object store
///
/// Cloning is cheap; clones share the store client and its provisioning.
///
/// # Type Parameters
///
/// * `C` - Connector constructing the object-store client
/// * `F` - Download transfer used by reads
pub struct ObjectFileSystem<C: Connect, F: Fetch> {
    inner: Arc<Inner<C, F>>,
}

struct Inner<C: Connect, F: Fetch> {
    repository: String,
    connector: C,
    fetcher: F,
    options: FileSystemOptions,
    client: OnceLock<Arc<C::Store>>,
    provisioning: Mutex<()>,
    state: AtomicU8,
}

impl<C: Connect, F: Fetch> Clone for ObjectFileSystem<C, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connect, F: Fetch> ObjectFileSystem<C, F> {
    /// Create a filesystem rooted at `repository`
    ///
    /// No backend call happens here; the client is provisioned on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository name or the options are invalid.
    pub fn new(
        repository: impl Into<String>,
        connector: C,
        fetcher: F,
        options: FileSystemOptions,
    ) -> anyhow::Result<Self> {
        let repository = repository.into();
        config::validate_repository(&repository)?;
        options.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                repository,
                connector,
                fetcher,
                options,
                client: OnceLock::new(),
                provisioning: Mutex::new(()),
                state: AtomicU8::new(ProvisionState::Uninitialized as u8),
            }),
        })
    }

    #[must_use]
    pub fn options(&self) -> &FileSystemOptions {
        &self.inner.options
    }

    #[must_use]
    pub fn provision_state(&self) -> ProvisionState {
        ProvisionState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Object key for `path`
    #[must_use]
    pub fn key(&self, path: &str, is_directory: bool) -> String {
        key::to_key(&self.inner.repository, path, is_directory)
    }

    pub(crate) fn repository_name(&self) -> &str {
        &self.inner.repository
    }

    pub(crate) fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    /// Translate a backend failure observed for `path`
    pub(crate) fn error(&self, path: &str, error: BackendError, access: Access) -> FsError {
        translate::translate(&self.inner.repository, path, error, access)
    }

    /// Error with a synthetic cause
    pub(crate) fn fail(&self, kind: ErrorKind, path: &str, message: impl Into<String>) -> FsError {
        FsError::with_message(kind, self.inner.repository.as_str(), path, message)
    }

    /// Ready store client, provisioning it on first use
    ///
    /// # Errors
    ///
    /// Returns `FsError::Bootstrap` if the client cannot be connected, or the
    /// root placeholder can neither be found nor created.
    pub(crate) async fn store(&self) -> Result<Arc<C::Store>> {
        if let Some(store) = self.inner.client.get() {
            return Ok(Arc::clone(store));
        }

        let _guard = self.inner.provisioning.lock().await;
        // Another caller may have finished while we waited for the lock
        if let Some(store) = self.inner.client.get() {
            return Ok(Arc::clone(store));
        }

        self.set_state(ProvisionState::Provisioning);
        match self.provision().await {
            Ok(store) => {
                let store = Arc::new(store);
                let store = Arc::clone(self.inner.client.get_or_init(|| store));
                self.set_state(ProvisionState::Ready);
                Ok(store)
            }
            Err(e) => {
                self.set_state(ProvisionState::Uninitialized);
                Err(e)
            }
        }
    }

    async fn provision(&self) -> Result<C::Store> {
        let repository = &self.inner.repository;
        info!(
            "Provisioning object store for repository {} (bucket: {})",
            repository,
            self.inner.options.bucket_url.as_deref().unwrap_or("default")
        );

        let store = self
            .inner
            .connector
            .connect(self.inner.options.bucket_url.as_deref())
            .await
            .map_err(|source| FsError::Bootstrap {
                repository: repository.clone(),
                source,
            })?;

        let root = self.key("/", true);
        match store.get_metadata(&root).await {
            Ok(_) => debug!("Root placeholder {} exists", root),
            Err(e) if translate::is_not_found(&e) => {
                info!("Creating root placeholder {}", root);
                store
                    .upload_empty(&root)
                    .await
                    .map_err(|source| FsError::Bootstrap {
                        repository: repository.clone(),
                        source,
                    })?;
            }
            Err(source) => {
                return Err(FsError::Bootstrap {
                    repository: repository.clone(),
                    source,
                })
            }
        }

        info!("Object store {} ready for {}", store.name(), repository);
        Ok(store)
    }

    fn set_state(&self, state: ProvisionState) {
        self.inner.state.store(state as u8, Ordering::Release);
    }
}

impl<C: Connect, F: Fetch> FileSystem for ObjectFileSystem<C, F> {
    type File = ObjectFile<C, F>;
    type Directory = ObjectDirectory<C, F>;

    fn file(&self, path: &str) -> Self::File {
        ObjectFile::new(self.clone(), path::normalize(path))
    }

    fn directory(&self, path: &str) -> Self::Directory {
        ObjectDirectory::new(self.clone(), path::normalize(path))
    }

    async fn head(&self, path: &str, options: HeadOptions) -> Result<Stats> {
        self.head_entry(&path::normalize(path), options).await
    }

    async fn patch(&self, path: &str, attributes: &Attributes, kind: EntryKind) -> Result<()> {
        self.patch_entry(&path::normalize(path), attributes, kind)
            .await
    }

    async fn to_url(&self, path: &str, kind: EntryKind, method: UrlMethod) -> Result<String> {
        self.entry_url(&path::normalize(path), kind, method).await
    }

    fn repository(&self) -> &str {
        &self.inner.repository
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.options.capabilities()
    }

    fn name(&self) -> &'static str {
        "object-store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MemoryObjectStore, Operation};

    fn fs(options: FileSystemOptions) -> ObjectFileSystem<MemoryObjectStore, MemoryObjectStore> {
        let store = MemoryObjectStore::new("unit");
        ObjectFileSystem::new("team/repo", store.clone(), store, options).unwrap()
    }

    #[test]
    fn test_provision_state_round_trip() {
        for state in [
            ProvisionState::Uninitialized,
            ProvisionState::Provisioning,
            ProvisionState::Ready,
        ] {
            assert_eq!(ProvisionState::from_u8(state as u8), state);
        }
        assert_eq!(ProvisionState::from_u8(42), ProvisionState::Uninitialized);
    }

    #[test]
    fn test_keys_live_under_repository() {
        let fs = fs(FileSystemOptions::default());
        assert_eq!(fs.key("/", true), "team/repo/");
        assert_eq!(fs.key("/a/b", false), "team/repo/a/b");
        assert_eq!(fs.key("/a/b", true), "team/repo/a/b/");
    }

    #[compio::test]
    async fn test_handles_normalize_paths() {
        let fs = fs(FileSystemOptions::default());
        assert_eq!(fs.file("a//b").key(), "team/repo/a/b");
        assert_eq!(fs.directory("a/b/").key(), "team/repo/a/b/");
        assert_eq!(fs.provision_state(), ProvisionState::Uninitialized);
    }

    #[compio::test]
    async fn test_clones_share_provisioning() {
        let store = MemoryObjectStore::new("unit");
        let fs = ObjectFileSystem::new(
            "repo",
            store.clone(),
            store.clone(),
            FileSystemOptions::default(),
        )
        .unwrap();
        let clone = fs.clone();
        fs.store().await.unwrap();
        clone.store().await.unwrap();
        assert_eq!(store.calls(Operation::Connect), 1);
        assert_eq!(clone.provision_state(), ProvisionState::Ready);
    }
}
