//! Entry resolution: is a path a file, a directory, or nothing?
//!
//! An object store answers three independent questions about a path:
//!
//! 1. Is there an object at the file key?
//! 2. Is there a placeholder object at the directory key?
//! 3. Are there any objects under the directory prefix?
//!
//! All three are asked concurrently and all three run to completion. The
//! answers are then inspected in that priority order: a file wins over a
//! placeholder, which wins over implicit children. When none succeeds, the
//! error of the highest-priority query that was issued is reported.

use crate::error::{ErrorKind, FsError, Result};
use crate::key;
use crate::stats::Stats;
use crate::traits::{EntryKind, HeadOptions, ObjectStore};
use crate::translate::{self, Access};
use tracing::debug;

/// How a path was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    File,
    /// Directory with a placeholder object
    Directory,
    /// Directory that only exists through objects under its prefix
    ImplicitDirectory,
}

/// Resolves paths against one repository of an object store
pub struct EntryResolver<'a, S: ObjectStore> {
    store: &'a S,
    repository: &'a str,
    directories: bool,
}

impl<'a, S: ObjectStore> EntryResolver<'a, S> {
    /// Create a resolver; with `directories == false` only file keys are probed
    pub const fn new(store: &'a S, repository: &'a str, directories: bool) -> Self {
        Self {
            store,
            repository,
            directories,
        }
    }

    /// Resolve `path` to normalized stats
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing exists at `path`, `NotReadable` if the
    /// backend fails.
    pub async fn resolve(&self, path: &str, options: HeadOptions) -> Result<Stats> {
        self.resolve_with_kind(path, options)
            .await
            .map(|(stats, _)| stats)
    }

    /// Resolve `path`, also reporting how it was resolved
    ///
    /// # Errors
    ///
    /// Same as [`EntryResolver::resolve`].
    pub async fn resolve_with_kind(
        &self,
        path: &str,
        options: HeadOptions,
    ) -> Result<(Stats, Resolution)> {
        let probe_file = options.kind != Some(EntryKind::Directory);
        let probe_directory = self.directories && options.kind != Some(EntryKind::File);
        if !probe_file && !probe_directory {
            return Err(FsError::with_message(
                ErrorKind::NotFound,
                self.repository,
                path,
                "directories are not supported",
            ));
        }

        let file_key = key::to_key(self.repository, path, false);
        let dir_key = key::to_key(self.repository, path, true);

        let (file_head, dir_head, dir_list) = futures::join!(
            async {
                if probe_file {
                    Some(self.store.get_metadata(&file_key).await)
                } else {
                    None
                }
            },
            async {
                if probe_directory {
                    Some(self.store.get_metadata(&dir_key).await)
                } else {
                    None
                }
            },
            async {
                if probe_directory {
                    Some(self.store.list(&dir_key, Some(1)).await)
                } else {
                    None
                }
            },
        );

        if let Some(Ok(object)) = &file_head {
            debug!("Resolved {} as file ({} bytes)", path, object.size);
            return Ok((Stats::from_object(object, false), Resolution::File));
        }
        if let Some(Ok(object)) = &dir_head {
            debug!("Resolved {} as directory placeholder", path);
            return Ok((Stats::from_object(object, true), Resolution::Directory));
        }
        if let Some(Ok(listing)) = &dir_list {
            if !listing.is_empty() {
                debug!("Resolved {} as implicit directory", path);
                return Ok((Stats::implicit_directory(), Resolution::ImplicitDirectory));
            }
        }

        let failure = file_head
            .and_then(std::result::Result::err)
            .or_else(|| dir_head.and_then(std::result::Result::err))
            .or_else(|| dir_list.and_then(std::result::Result::err));
        Err(match failure {
            Some(e) => translate::translate(self.repository, path, e, Access::Read),
            // Only an empty listing was obtained
            None => FsError::new(ErrorKind::NotFound, self.repository, path, None),
        })
    }
}
