//! Filesystem configuration
//!
//! Options are grouped the way a host CLI would flatten them: the bucket
//! binding, the capability switches, and the upload representation.
//!
//! ```rust,ignore
//! #[derive(clap::Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     storage: bucketfs::FileSystemOptions,
//! }
//! ```

use crate::payload::TransferMode;
use anyhow::Result;

/// Options for an object-store filesystem
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
#[command(next_help_heading = "Object Store Options")]
pub struct FileSystemOptions {
    /// Bucket to bind the client to (e.g. `gs://my-bucket`); the client default otherwise
    #[arg(long, value_name = "URL")]
    pub bucket_url: Option<String>,

    /// Feature switches of the backend variant
    #[command(flatten)]
    pub features: FeatureConfig,

    /// Upload buffer representation
    #[arg(long, value_enum, default_value = "buffered")]
    pub transfer_mode: TransferMode,
}

/// Backend variant switches
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Do not emulate directories; every path is treated as a file key
    #[arg(long)]
    pub no_directories: bool,

    /// Reject appends instead of emulating them with read-then-rewrite
    #[arg(long)]
    pub no_append: bool,
}

/// Capability flags a filesystem reports to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub directories: bool,
    pub append: bool,
    pub range_read: bool,
    pub range_write: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            directories: true,
            append: true,
            range_read: false,
            range_write: false,
        }
    }
}

impl FileSystemOptions {
    #[must_use]
    pub fn with_bucket_url(mut self, url: impl Into<String>) -> Self {
        self.bucket_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn without_directories(mut self) -> Self {
        self.features.no_directories = true;
        self
    }

    #[must_use]
    pub fn without_append(mut self) -> Self {
        self.features.no_append = true;
        self
    }

    #[must_use]
    pub fn with_transfer_mode(mut self, mode: TransferMode) -> Self {
        self.transfer_mode = mode;
        self
    }

    /// Capabilities implied by these options
    ///
    /// Ranged reads and writes are never available: the backend only stores
    /// and serves whole objects.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities {
            directories: !self.features.no_directories,
            append: !self.features.no_append,
            range_read: false,
            range_write: false,
        }
    }

    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket URL has no `scheme://` prefix or names
    /// no bucket.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.bucket_url {
            let Some((scheme, bucket)) = url.split_once("://") else {
                anyhow::bail!("Bucket URL must have the form scheme://bucket, got: {url}");
            };
            if scheme.is_empty() || bucket.trim_matches('/').is_empty() {
                anyhow::bail!("Bucket URL must name a scheme and a bucket, got: {url}");
            }
        }
        Ok(())
    }
}

/// Validate a repository name (the key prefix all paths live under)
///
/// # Errors
///
/// Returns an error if the repository is empty or consists only of separators.
pub fn validate_repository(repository: &str) -> Result<()> {
    if repository.trim_matches('/').is_empty() {
        anyhow::bail!("Repository must name a non-empty key prefix, got: {repository:?}");
    }
    Ok(())
}
