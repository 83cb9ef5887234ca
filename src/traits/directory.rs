//! DirectoryHandle trait for directory operations
//!
//! Directories do not exist natively in an object store. They are emulated by
//! zero-length placeholder objects and by the prefixes of other objects.

use crate::error::Result;

/// Directory operations bound to one logical path
///
/// # Examples
///
/// ```rust,ignore
/// let dir = fs.directory("/photos");
/// dir.mkdir().await?;
/// for child in dir.list().await? {
///     println!("{child}");
/// }
/// ```
pub trait DirectoryHandle: Send + Sync + 'static {
    /// Logical path of this directory
    fn path(&self) -> &str;

    /// List the immediate children
    ///
    /// # Returns
    ///
    /// Returns the logical paths of child files and child directories. The
    /// directory itself is never included.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if the listing fails (`NotReadable`).
    async fn list(&self) -> Result<Vec<String>>;

    /// Create the directory placeholder
    ///
    /// Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` with `NoModificationAllowed` if the upload fails
    /// or directories are disabled.
    async fn mkdir(&self) -> Result<()>;

    /// Delete the directory placeholder
    ///
    /// Children are not touched; a directory that only exists through its
    /// children has no placeholder and cannot be removed this way.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - No placeholder exists (`NotFound`)
    /// - The delete fails or directories are disabled (`NoModificationAllowed`)
    async fn rmdir(&self) -> Result<()>;
}
