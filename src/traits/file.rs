//! FileHandle trait for file operations
//!
//! A file handle is a cheap, path-bound view over a filesystem. It holds no
//! open backend resource; every call resolves the object key again.

use crate::error::Result;
use crate::payload::{self, ByteStream};
use crate::stats::Attributes;
use bytes::Bytes;

/// Options accepted by [`FileHandle::write`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Keep the existing content and add the new data after it
    pub append: bool,
    /// Custom attributes to store alongside the content
    pub attributes: Option<Attributes>,
}

impl WriteOptions {
    #[must_use]
    pub fn append() -> Self {
        Self {
            append: true,
            attributes: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

/// File operations bound to one logical path
///
/// # Examples
///
/// ```rust,ignore
/// let file = fs.file("/notes/today.txt");
/// file.write(Bytes::from_static(b"hello"), WriteOptions::default()).await?;
/// file.write(Bytes::from_static(b" world"), WriteOptions::append()).await?;
/// assert_eq!(file.read_to_end().await?, "hello world");
/// ```
pub trait FileHandle: Send + Sync + 'static {
    /// Logical path of this file
    fn path(&self) -> &str;

    /// Open the content as a byte stream
    ///
    /// # Returns
    ///
    /// Returns a finite, single-pass stream. Chunks are pulled from the
    /// transfer as the stream is polled.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The file doesn't exist (`NotFound`)
    /// - The transfer fails or answers with a non-200 status (`NotReadable`)
    async fn read(&self) -> Result<ByteStream>;

    /// Replace (or append to) the file content
    ///
    /// # Parameters
    ///
    /// * `data` - Bytes to store
    /// * `options` - Append flag and attributes to record
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - Append is requested but not supported (`NoModificationAllowed`)
    /// - The existing content cannot be read for an append
    /// - The upload or the metadata update fails (`NoModificationAllowed`)
    async fn write(&self, data: Bytes, options: WriteOptions) -> Result<()>;

    /// Delete the file
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` with `NotFound` if no object exists, or
    /// `NoModificationAllowed` if the delete fails.
    async fn remove(&self) -> Result<()>;

    // =========================================================================
    // Provided methods with default implementations
    // =========================================================================

    /// Read the whole content into memory
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FileHandle::read`] and any mid-stream failure.
    async fn read_to_end(&self) -> Result<Bytes> {
        payload::collect(self.read().await?).await
    }
}
