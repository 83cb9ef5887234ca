//! File handle of the object-store filesystem

use crate::error::Result;
use crate::payload::ByteStream;
use crate::traits::{Connect, Fetch, FileHandle, WriteOptions};
use bytes::Bytes;

use super::ObjectFileSystem;

/// A file path bound to an [`ObjectFileSystem`]
pub struct ObjectFile<C: Connect, F: Fetch> {
    fs: ObjectFileSystem<C, F>,
    path: String,
}

impl<C: Connect, F: Fetch> ObjectFile<C, F> {
    pub(crate) const fn new(fs: ObjectFileSystem<C, F>, path: String) -> Self {
        Self { fs, path }
    }

    /// Object key backing this file
    #[must_use]
    pub fn key(&self) -> String {
        self.fs.key(&self.path, false)
    }
}

impl<C: Connect, F: Fetch> FileHandle for ObjectFile<C, F> {
    fn path(&self) -> &str {
        &self.path
    }

    async fn read(&self) -> Result<ByteStream> {
        self.fs.open_read(&self.path).await
    }

    async fn write(&self, data: Bytes, options: WriteOptions) -> Result<()> {
        self.fs.write_file(&self.path, data, options).await
    }

    async fn remove(&self) -> Result<()> {
        self.fs.remove_file(&self.path).await
    }
}
