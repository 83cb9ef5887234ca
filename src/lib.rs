//! bucketfs - hierarchical filesystem semantics over a flat object store
//!
//! An object store only knows keys, prefixes and blobs. This crate maps a
//! repository of logical paths onto it:
//!
//! - paths become keys under a repository prefix; directories are emulated
//!   with zero-length placeholder objects ([`key`])
//! - `head` decides whether a path is a file, a directory, or an implicit
//!   directory with three concurrent probes ([`resolver`])
//! - reads go through retrieval URLs and a pluggable download transfer, and
//!   appends are emulated by read-then-rewrite ([`filesystem`])
//! - every backend failure is classified into one error taxonomy
//!   ([`translate`], [`error`])
//!
//! # Example
//!
//! ```rust,ignore
//! use bucketfs::{FileSystem, FileSystemOptions, MemoryObjectStore, ObjectFileSystem};
//!
//! let store = MemoryObjectStore::new("bucket");
//! let fs = ObjectFileSystem::new("repo", store.clone(), store, FileSystemOptions::default())?;
//! fs.write_all("/hello.txt", "hi".into()).await?;
//! assert_eq!(fs.read_to_end("/hello.txt").await?, "hi");
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod key;
pub mod path;
pub mod payload;
pub mod resolver;
pub mod stats;
pub mod traits;
pub mod translate;

pub use backends::MemoryObjectStore;
pub use config::{Capabilities, FileSystemOptions};
pub use error::{BackendError, ErrorCode, ErrorKind, FsError, Result};
pub use filesystem::{ObjectFileSystem, ProvisionState};
pub use payload::{Payload, TransferMode};
pub use stats::{Attributes, Stats};
pub use traits::{
    Connect, DirectoryHandle, EntryKind, Fetch, FileHandle, FileSystem, HeadOptions, ObjectStore,
    UrlMethod, WriteOptions,
};
