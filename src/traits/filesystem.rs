//! FileSystem trait: the generic hierarchical filesystem contract
//!
//! This trait is what callers program against. It is implemented by the
//! object-store adapter ([`crate::ObjectFileSystem`]) and provides the generic
//! conveniences (recursive create/remove, append emulation) on top of the
//! primitive operations.

use crate::config::Capabilities;
use crate::error::Result;
use crate::path;
use crate::stats::{Attributes, Stats};
use bytes::{Bytes, BytesMut};
use tracing::debug;

use super::{DirectoryHandle, FileHandle, WriteOptions};

/// Kind of entry an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Options for [`FileSystem::head`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadOptions {
    /// Only probe for this kind of entry; both when `None`
    pub kind: Option<EntryKind>,
}

impl HeadOptions {
    #[must_use]
    pub const fn file() -> Self {
        Self {
            kind: Some(EntryKind::File),
        }
    }

    #[must_use]
    pub const fn directory() -> Self {
        Self {
            kind: Some(EntryKind::Directory),
        }
    }
}

/// HTTP method a generated URL is meant for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlMethod {
    #[default]
    Get,
    Head,
    Put,
    Post,
    Delete,
}

impl UrlMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Unified filesystem interface
///
/// # Type Parameters
///
/// * `File` - Handle type returned by [`FileSystem::file`]
/// * `Directory` - Handle type returned by [`FileSystem::directory`]
///
/// # Examples
///
/// ```rust,ignore
/// let store = MemoryObjectStore::new("bucket");
/// let fs = ObjectFileSystem::new("repo", store.clone(), store, FileSystemOptions::default())?;
///
/// fs.create_directory_all("/a/b").await?;
/// fs.write_all("/a/b/c.txt", Bytes::from_static(b"data")).await?;
/// let stats = fs.stat("/a/b/c.txt").await?;
/// assert_eq!(stats.size, Some(4));
/// ```
pub trait FileSystem: Send + Sync + 'static {
    /// The file handle type for this filesystem
    type File: FileHandle;

    /// The directory handle type for this filesystem
    type Directory: DirectoryHandle;

    /// Handle for the file at `path`; nothing is checked until it is used
    fn file(&self, path: &str) -> Self::File;

    /// Handle for the directory at `path`; nothing is checked until it is used
    fn directory(&self, path: &str) -> Self::Directory;

    /// Resolve the entry at `path`
    ///
    /// # Parameters
    ///
    /// * `path` - Logical path
    /// * `options` - Restrict resolution to files or directories
    ///
    /// # Returns
    ///
    /// Returns file stats (with `size`), directory stats (without `size`), or
    /// empty stats for a directory that only exists through its children.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` with `NotFound` if nothing exists at `path`, or
    /// `NotReadable` if the backend fails.
    async fn head(&self, path: &str, options: HeadOptions) -> Result<Stats>;

    /// Replace the custom attributes of an entry
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` with `NotFound` if the entry's object is missing,
    /// or `NoModificationAllowed` if the update fails.
    async fn patch(&self, path: &str, attributes: &Attributes, kind: EntryKind) -> Result<()>;

    /// URL through which the entry can be fetched
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - `kind` is a directory (`TypeMismatch`)
    /// - `method` is not `GET` (`NotReadable`)
    /// - The file does not exist (`NotFound`)
    async fn to_url(&self, path: &str, kind: EntryKind, method: UrlMethod) -> Result<String>;

    /// Repository (key prefix) this filesystem is rooted at
    fn repository(&self) -> &str;

    /// Capability flags of the backend variant
    fn capabilities(&self) -> Capabilities;

    /// Get the filesystem name for debugging/logging
    fn name(&self) -> &'static str {
        "unknown"
    }

    // =========================================================================
    // Provided methods with default implementations
    // =========================================================================

    fn supports_directories(&self) -> bool {
        self.capabilities().directories
    }

    fn supports_append(&self) -> bool {
        self.capabilities().append
    }

    fn supports_range_read(&self) -> bool {
        self.capabilities().range_read
    }

    fn supports_range_write(&self) -> bool {
        self.capabilities().range_write
    }

    /// Resolve `path` as either kind
    ///
    /// # Errors
    ///
    /// Same as [`FileSystem::head`].
    async fn stat(&self, path: &str) -> Result<Stats> {
        self.head(path, HeadOptions::default()).await
    }

    /// Check if anything exists at `path`
    ///
    /// # Errors
    ///
    /// Returns every failure of [`FileSystem::stat`] except `NotFound`.
    async fn exists(&self, path: &str) -> Result<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Read a whole file into memory
    ///
    /// # Errors
    ///
    /// Same as [`FileHandle::read`].
    async fn read_to_end(&self, path: &str) -> Result<Bytes> {
        self.file(path).read_to_end().await
    }

    /// Replace a file's content
    ///
    /// # Errors
    ///
    /// Same as [`FileHandle::write`].
    async fn write_all(&self, path: &str, data: Bytes) -> Result<()> {
        self.file(path).write(data, WriteOptions::default()).await
    }

    /// Append to a file, creating it if missing
    ///
    /// Uses the backend append when available. Otherwise the existing content
    /// is read and rewritten together with `data`, which is not atomic.
    ///
    /// # Errors
    ///
    /// Returns read errors other than a confirmed absence, and write errors.
    async fn append(&self, path: &str, data: Bytes) -> Result<()> {
        let file = self.file(path);
        if self.supports_append() {
            return file.write(data, WriteOptions::append()).await;
        }

        debug!("Emulating append for {} in the generic layer", path);
        let head = match file.read_to_end().await {
            Ok(head) => head,
            Err(e) if e.is_absent() => Bytes::new(),
            Err(e) => return Err(e),
        };
        let mut merged = BytesMut::with_capacity(head.len() + data.len());
        merged.extend_from_slice(&head);
        merged.extend_from_slice(&data);
        file.write(merged.freeze(), WriteOptions::default()).await
    }

    /// Create a directory and all of its ancestors
    ///
    /// Each ancestor gets its own placeholder, so every level stays visible
    /// even if its children are later removed.
    ///
    /// # Errors
    ///
    /// Returns the first failing `mkdir`.
    async fn create_directory_all(&self, path: &str) -> Result<()> {
        let mut chain = Vec::new();
        let mut current = Some(path::normalize(path));
        while let Some(dir) = current {
            if path::is_root(&dir) {
                break;
            }
            current = path::parent(&dir);
            chain.push(dir);
        }
        for dir in chain.iter().rev() {
            self.directory(dir).mkdir().await?;
        }
        Ok(())
    }

    /// Remove a file, or a directory with everything under it
    ///
    /// Directories are walked breadth-first; files are deleted as they are
    /// found and placeholders are deleted deepest-first afterwards. A
    /// directory without a placeholder is not an error. The repository root
    /// placeholder is kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing exists at `path`, and the first failure
    /// other than `NotFound` encountered while deleting.
    async fn remove_all(&self, path: &str) -> Result<()> {
        let path = path::normalize(path);
        if self.stat(&path).await?.is_file() {
            return self.file(&path).remove().await;
        }

        let mut dirs = vec![path];
        let mut idx = 0;
        while idx < dirs.len() {
            let children = self.directory(&dirs[idx]).list().await?;
            for child in children {
                match self.stat(&child).await {
                    Ok(stats) if stats.is_file() => match self.file(&child).remove().await {
                        Ok(()) => {}
                        Err(e) if e.is_not_found() => {}
                        Err(e) => return Err(e),
                    },
                    Ok(_) => {
                        if !dirs.contains(&child) {
                            dirs.push(child);
                        }
                    }
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
            }
            idx += 1;
        }

        for dir in dirs.iter().rev() {
            if path::is_root(dir) {
                continue;
            }
            match self.directory(dir).rmdir().await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
