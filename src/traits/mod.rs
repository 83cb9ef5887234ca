//! Core traits for the filesystem abstraction
//!
//! Two sides meet here:
//!
//! - The generic filesystem contract callers use: [`FileSystem`],
//!   [`FileHandle`], [`DirectoryHandle`].
//! - The collaborators the adapter consumes: [`ObjectStore`] (with
//!   [`Connect`] to construct it) and [`Fetch`] for downloads.

pub mod directory;
pub mod fetch;
pub mod file;
pub mod filesystem;
pub mod store;

pub use directory::DirectoryHandle;
pub use fetch::{BodyStream, Fetch, FetchResponse};
pub use file::{FileHandle, WriteOptions};
pub use filesystem::{EntryKind, FileSystem, HeadOptions, UrlMethod};
pub use store::{Connect, ListResult, ObjectMetadata, ObjectStore};
