//! File uploads and deletes
//!
//! The backend has no partial or ranged writes. Every write uploads the whole
//! object; an append first downloads the existing content and uploads it again
//! in front of the new data. That is not atomic, and costs the size of the
//! existing file in both bandwidth and memory. Concurrent appends to the same
//! path may lose data (last write wins).

use crate::error::{ErrorKind, Result};
use crate::payload::{self, Payload};
use crate::traits::{Connect, Fetch, ObjectStore, WriteOptions};
use crate::translate::Access;
use bytes::Bytes;
use tracing::{debug, warn};

use super::ObjectFileSystem;

/// Existing content above this size makes an emulated append log a warning
const LARGE_APPEND_REWRITE: usize = 64 * 1024 * 1024;

impl<C: Connect, F: Fetch> ObjectFileSystem<C, F> {
    /// Upload `data` to the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - Append is requested on a backend variant without append (`NoModificationAllowed`)
    /// - The existing content cannot be read; only a confirmed absence appends to nothing
    /// - The upload or the attribute update fails (`NoModificationAllowed`)
    pub(crate) async fn write_file(
        &self,
        path: &str,
        data: Bytes,
        options: WriteOptions,
    ) -> Result<()> {
        let head = if options.append {
            self.existing_content(path).await?
        } else {
            None
        };

        let mode = self.options().transfer_mode;
        let upload = Payload::compose(mode, head, data);
        let store = self.store().await?;
        let key = self.key(path, false);

        debug!("Uploading {} bytes to {} ({:?})", upload.len(), key, mode);
        store
            .upload_data(&key, upload)
            .await
            .map_err(|e| self.error(path, e, Access::Write))?;

        if let Some(attributes) = options.attributes {
            store
                .update_metadata(&key, attributes.to_custom_metadata())
                .await
                .map_err(|e| self.error(path, e, Access::Write))?;
        }
        Ok(())
    }

    /// Current content for an append, `None` if the file does not exist yet
    async fn existing_content(&self, path: &str) -> Result<Option<Bytes>> {
        if !self.options().capabilities().append {
            return Err(self.fail(
                ErrorKind::NoModificationAllowed,
                path,
                "append is not supported",
            ));
        }

        let stream = match self.open_read(path).await {
            Ok(stream) => stream,
            Err(e) if e.is_absent() => {
                debug!("Append target {} does not exist; writing new file", path);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let head = payload::collect(stream).await?;
        if head.len() > LARGE_APPEND_REWRITE {
            warn!(
                "Emulating append on {} rewrites {} existing bytes",
                path,
                head.len()
            );
        }
        Ok(Some(head))
    }

    /// Delete the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object exists, `NoModificationAllowed` if the
    /// delete fails.
    pub(crate) async fn remove_file(&self, path: &str) -> Result<()> {
        let store = self.store().await?;
        let key = self.key(path, false);
        debug!("Deleting {}", key);
        store
            .delete_object(&key)
            .await
            .map_err(|e| self.error(path, e, Access::Write))
    }
}
