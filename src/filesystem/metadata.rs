//! Head, attribute patches and retrieval URLs
//!
//! All three operate on object metadata only; no content is transferred.

use crate::error::{ErrorKind, Result};
use crate::resolver::EntryResolver;
use crate::stats::{Attributes, Stats};
use crate::traits::{Connect, EntryKind, Fetch, HeadOptions, ObjectStore, UrlMethod};
use crate::translate::{self, Access};
use tracing::debug;

use super::ObjectFileSystem;

impl<C: Connect, F: Fetch> ObjectFileSystem<C, F> {
    /// Resolve `path` with the entry resolver
    pub(crate) async fn head_entry(&self, path: &str, options: HeadOptions) -> Result<Stats> {
        let store = self.store().await?;
        let directories = self.options().capabilities().directories;
        EntryResolver::new(store.as_ref(), self.repository_name(), directories)
            .resolve(path, options)
            .await
    }

    /// Replace the custom attributes stored on an entry's object
    ///
    /// The object must already exist; the backend cannot attach metadata to a
    /// key without content. Directory attributes live on the placeholder.
    pub(crate) async fn patch_entry(
        &self,
        path: &str,
        attributes: &Attributes,
        kind: EntryKind,
    ) -> Result<()> {
        let is_directory = kind == EntryKind::Directory;
        let store = self.store().await?;
        let key = self.key(path, is_directory);

        store
            .get_metadata(&key)
            .await
            .map_err(|e| self.error(path, e, Access::Write))?;

        let custom = attributes.to_custom_metadata();
        debug!("Updating {} custom attributes on {}", custom.len(), key);
        store
            .update_metadata(&key, custom)
            .await
            .map_err(|e| self.error(path, e, Access::Write))?;
        Ok(())
    }

    /// Retrieval URL of a file; only `GET` URLs exist
    pub(crate) async fn entry_url(
        &self,
        path: &str,
        kind: EntryKind,
        method: UrlMethod,
    ) -> Result<String> {
        if kind == EntryKind::Directory {
            return Err(self.fail(
                ErrorKind::TypeMismatch,
                path,
                format!("\"{path}\" is a directory"),
            ));
        }
        if method != UrlMethod::Get {
            return Err(translate::translate_message(
                self.repository_name(),
                path,
                format!("\"{}\" is not supported", method.as_str()),
                Access::Read,
            ));
        }

        let store = self.store().await?;
        store
            .get_download_url(&self.key(path, false))
            .await
            .map_err(|e| self.error(path, e, Access::Read))
    }
}
