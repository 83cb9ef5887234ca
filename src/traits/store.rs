//! ObjectStore trait: the narrow capability surface of the object-store client
//!
//! The adapter consumes a backend only through this trait. Wire protocol,
//! authentication and retries are the implementor's concern.

use crate::error::BackendResult;
use crate::payload::Payload;
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Backend-native metadata of one object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Full object key
    pub key: String,
    /// Content length in bytes
    pub size: u64,
    pub time_created: Option<SystemTime>,
    pub updated: Option<SystemTime>,
    /// Content hash reported by the backend
    pub md5_hash: Option<String>,
    /// User-defined string metadata
    pub custom_metadata: BTreeMap<String, String>,
}

/// One page of a delimiter listing under a prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    /// Common prefixes one level down, each ending with the separator
    pub prefixes: Vec<String>,
    /// Full keys of objects directly under the prefix
    pub items: Vec<String>,
    /// Token for the next page, `None` on the last page
    pub next_page_token: Option<String>,
}

impl ListResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.items.is_empty()
    }
}

/// Object-store client capabilities
///
/// # Examples
///
/// ```rust,ignore
/// let meta = store.get_metadata("repo/docs/readme.md").await?;
/// store.upload_data("repo/docs/copy.md", Payload::from(b"hi".to_vec())).await?;
/// let page = store.list("repo/docs/", Some(1)).await?;
/// ```
pub trait ObjectStore: Send + Sync + 'static {
    /// Metadata of the object at `key`
    ///
    /// # Errors
    ///
    /// Returns `storage/object-not-found` when no object exists at `key`.
    async fn get_metadata(&self, key: &str) -> BackendResult<ObjectMetadata>;

    /// Replace the custom metadata of an existing object
    ///
    /// # Errors
    ///
    /// Returns `storage/object-not-found` when no object exists at `key`.
    async fn update_metadata(
        &self,
        key: &str,
        custom: BTreeMap<String, String>,
    ) -> BackendResult<ObjectMetadata>;

    /// Store `payload` at `key`, replacing any existing object
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    async fn upload_data(&self, key: &str, payload: Payload) -> BackendResult<ObjectMetadata>;

    /// Delete the object at `key`
    ///
    /// # Errors
    ///
    /// Returns `storage/object-not-found` when no object exists at `key`.
    async fn delete_object(&self, key: &str) -> BackendResult<()>;

    /// One page of the delimiter listing under `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    async fn list_page(
        &self,
        prefix: &str,
        max_results: Option<usize>,
        page_token: Option<&str>,
    ) -> BackendResult<ListResult>;

    /// Retrieval URL serving the content of `key`
    ///
    /// # Errors
    ///
    /// Returns `storage/object-not-found` when no object exists at `key`.
    async fn get_download_url(&self, key: &str) -> BackendResult<String>;

    // =========================================================================
    // Provided methods with default implementations
    // =========================================================================

    /// Store a zero-length object at `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    async fn upload_empty(&self, key: &str) -> BackendResult<()> {
        self.upload_data(key, Payload::empty()).await?;
        Ok(())
    }

    /// First page of the listing under `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    async fn list(&self, prefix: &str, max_results: Option<usize>) -> BackendResult<ListResult> {
        self.list_page(prefix, max_results, None).await
    }

    /// Complete listing under `prefix`, following page tokens
    ///
    /// # Errors
    ///
    /// Returns the first page request that fails.
    async fn list_all(&self, prefix: &str) -> BackendResult<ListResult> {
        let mut all = ListResult::default();
        let mut token: Option<String> = None;
        loop {
            let page = self.list_page(prefix, None, token.as_deref()).await?;
            all.prefixes.extend(page.prefixes);
            all.items.extend(page.items);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(all)
    }

    /// Backend name for debugging/logging
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Constructs an object-store client handle
///
/// Invoked exactly once per filesystem, during root provisioning.
pub trait Connect: Send + Sync + 'static {
    type Store: ObjectStore;

    /// Open a client, optionally bound to an explicit bucket URL
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the bucket is unknown.
    async fn connect(&self, bucket_url: Option<&str>) -> BackendResult<Self::Store>;
}
