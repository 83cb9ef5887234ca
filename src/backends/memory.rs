//! In-process object store
//!
//! `MemoryObjectStore` keeps objects in a concurrent map and reproduces the
//! object-store behavior the adapter relies on:
//!
//! - missing keys fail with `storage/object-not-found` (HTTP 404)
//! - listings split keys under a prefix into `items` and one-level `prefixes`;
//!   an object stored exactly at the prefix is listed as an item
//! - listings are paged, with `next_page_token` naming the last entry returned
//! - objects carry an md5 content hash and creation/update timestamps
//! - download URLs have the form `memory://<bucket>/<key>` and are served by
//!   the store's own [`Fetch`] implementation with HTTP-like status codes
//!
//! For tests, failures can be injected per operation (optionally per key),
//! fetches can be made to answer with a status or to break, and every
//! operation is counted.

use crate::error::{BackendError, BackendResult, ErrorCode, TransportError};
use crate::payload::Payload;
use crate::traits::{
    BodyStream, Connect, Fetch, FetchResponse, ListResult, ObjectMetadata, ObjectStore,
};
use bytes::Bytes;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::debug;

const URL_SCHEME: &str = "memory://";
const DEFAULT_PAGE_SIZE: usize = 1000;
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Operations of the store, for fault injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    GetMetadata,
    UpdateMetadata,
    Upload,
    Delete,
    List,
    DownloadUrl,
    Fetch,
}

impl Operation {
    const ALL: [Self; 8] = [
        Self::Connect,
        Self::GetMetadata,
        Self::UpdateMetadata,
        Self::Upload,
        Self::Delete,
        Self::List,
        Self::DownloadUrl,
        Self::Fetch,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Injected behavior of [`Fetch::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFault {
    /// Answer with this status and status text, no body
    Status(u16, String),
    /// Fail before a status is obtained
    Transport(String),
    /// Answer 200, yield the first chunk, then fail
    Interrupted(String),
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    metadata: ObjectMetadata,
}

/// Per-operation call counters
///
/// Lock-free; `Ordering::Relaxed` is enough because the counters only feed
/// test assertions.
#[derive(Debug, Default)]
struct CallCounters {
    calls: [AtomicU64; 8],
}

impl CallCounters {
    fn increment(&self, op: Operation) {
        self.calls[op.index()].fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self, op: Operation) -> u64 {
        self.calls[op.index()].load(Ordering::Relaxed)
    }

    fn reset(&self) {
        for op in Operation::ALL {
            self.calls[op.index()].store(0, Ordering::Relaxed);
        }
    }
}

#[derive(Debug)]
struct Shared {
    bucket: String,
    objects: DashMap<String, StoredObject>,
    faults: DashMap<(Operation, Option<String>), BackendError>,
    fetch_fault: Mutex<Option<FetchFault>>,
    counters: CallCounters,
    page_size: usize,
    chunk_size: usize,
}

/// Object store held entirely in memory
///
/// Clones share the same objects.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    shared: Arc<Shared>,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("default")
    }
}

impl MemoryObjectStore {
    /// Create an empty store for `bucket`
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_limits(bucket, DEFAULT_PAGE_SIZE, DEFAULT_CHUNK_SIZE)
    }

    /// Create a store with explicit listing page size and download chunk size
    pub fn with_limits(bucket: impl Into<String>, page_size: usize, chunk_size: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                bucket: bucket.into(),
                objects: DashMap::new(),
                faults: DashMap::new(),
                fetch_fault: Mutex::new(None),
                counters: CallCounters::default(),
                page_size: page_size.max(1),
                chunk_size: chunk_size.max(1),
            }),
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.shared.bucket
    }

    /// Whether an object exists at `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.shared.objects.contains_key(key)
    }

    /// Content of the object at `key`
    #[must_use]
    pub fn data(&self, key: &str) -> Option<Bytes> {
        self.shared.objects.get(key).map(|obj| obj.data.clone())
    }

    /// All keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .shared
            .objects
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Make `op` fail with `error` for every key
    pub fn fail(&self, op: Operation, error: BackendError) {
        self.shared.faults.insert((op, None), error);
    }

    /// Make `op` fail with `error` for `key` only
    pub fn fail_key(&self, op: Operation, key: impl Into<String>, error: BackendError) {
        self.shared.faults.insert((op, Some(key.into())), error);
    }

    /// Override the behavior of the next and all later fetches
    pub fn fail_fetch(&self, fault: FetchFault) {
        if let Ok(mut slot) = self.shared.fetch_fault.lock() {
            *slot = Some(fault);
        }
    }

    /// Remove every injected failure
    pub fn clear_faults(&self) {
        self.shared.faults.clear();
        if let Ok(mut slot) = self.shared.fetch_fault.lock() {
            *slot = None;
        }
    }

    /// Number of times `op` was invoked
    #[must_use]
    pub fn calls(&self, op: Operation) -> u64 {
        self.shared.counters.get(op)
    }

    pub fn reset_calls(&self) {
        self.shared.counters.reset();
    }

    /// Count the call and return the injected failure, if any
    fn enter(&self, op: Operation, key: &str) -> BackendResult<()> {
        self.shared.counters.increment(op);
        let fault = self
            .shared
            .faults
            .get(&(op, Some(key.to_string())))
            .or_else(|| self.shared.faults.get(&(op, None)))
            .map(|fault| fault.value().clone());
        match fault {
            Some(error) => {
                debug!("Injected {:?} failure for {}: {}", op, key, error);
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{URL_SCHEME}{}/{key}", self.shared.bucket)
    }

    fn key_for_url<'u>(&self, url: &'u str) -> Option<&'u str> {
        url.strip_prefix(URL_SCHEME)?
            .strip_prefix(self.shared.bucket.as_str())?
            .strip_prefix('/')
    }

    fn current_fetch_fault(&self) -> Option<FetchFault> {
        self.shared
            .fetch_fault
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }

    fn chunked(&self, data: &Bytes) -> Vec<Bytes> {
        let size = self.shared.chunk_size;
        (0..data.len())
            .step_by(size)
            .map(|start| data.slice(start..(start + size).min(data.len())))
            .collect()
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn get_metadata(&self, key: &str) -> BackendResult<ObjectMetadata> {
        self.enter(Operation::GetMetadata, key)?;
        self.shared
            .objects
            .get(key)
            .map(|obj| obj.metadata.clone())
            .ok_or_else(|| BackendError::object_not_found(key))
    }

    async fn update_metadata(
        &self,
        key: &str,
        custom: BTreeMap<String, String>,
    ) -> BackendResult<ObjectMetadata> {
        self.enter(Operation::UpdateMetadata, key)?;
        let mut obj = self
            .shared
            .objects
            .get_mut(key)
            .ok_or_else(|| BackendError::object_not_found(key))?;
        obj.metadata.custom_metadata = custom;
        obj.metadata.updated = Some(SystemTime::now());
        Ok(obj.metadata.clone())
    }

    async fn upload_data(&self, key: &str, payload: Payload) -> BackendResult<ObjectMetadata> {
        self.enter(Operation::Upload, key)?;
        let data = payload.into_bytes();
        let now = SystemTime::now();
        let metadata = ObjectMetadata {
            key: key.to_string(),
            size: data.len() as u64,
            time_created: Some(now),
            updated: Some(now),
            md5_hash: Some(format!("{:x}", md5::compute(&data))),
            custom_metadata: BTreeMap::new(),
        };
        self.shared.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                metadata: metadata.clone(),
            },
        );
        Ok(metadata)
    }

    async fn delete_object(&self, key: &str) -> BackendResult<()> {
        self.enter(Operation::Delete, key)?;
        self.shared
            .objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BackendError::object_not_found(key))
    }

    async fn list_page(
        &self,
        prefix: &str,
        max_results: Option<usize>,
        page_token: Option<&str>,
    ) -> BackendResult<ListResult> {
        self.enter(Operation::List, prefix)?;

        // (name, is_prefix), ordered and deduplicated
        let mut entries = BTreeSet::new();
        for entry in self.shared.objects.iter() {
            let key = entry.key();
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };
            match rest.find('/') {
                Some(idx) => entries.insert((format!("{prefix}{}", &rest[..=idx]), true)),
                None => entries.insert((key.clone(), false)),
            };
        }

        let limit = max_results
            .unwrap_or(self.shared.page_size)
            .clamp(1, self.shared.page_size);
        let mut remaining = entries
            .into_iter()
            .filter(|(name, _)| page_token.is_none_or(|token| name.as_str() > token))
            .peekable();

        let mut page = ListResult::default();
        let mut last = None;
        for (name, is_prefix) in remaining.by_ref().take(limit) {
            last = Some(name.clone());
            if is_prefix {
                page.prefixes.push(name);
            } else {
                page.items.push(name);
            }
        }
        if remaining.peek().is_some() {
            page.next_page_token = last;
        }
        Ok(page)
    }

    async fn get_download_url(&self, key: &str) -> BackendResult<String> {
        self.enter(Operation::DownloadUrl, key)?;
        if self.shared.objects.contains_key(key) {
            Ok(self.url_for(key))
        } else {
            Err(BackendError::object_not_found(key))
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl Connect for MemoryObjectStore {
    type Store = Self;

    async fn connect(&self, bucket_url: Option<&str>) -> BackendResult<Self::Store> {
        self.enter(Operation::Connect, bucket_url.unwrap_or_default())?;
        if let Some(url) = bucket_url {
            let bucket = url
                .split_once("://")
                .map_or(url, |(_, rest)| rest)
                .trim_matches('/');
            if bucket != self.shared.bucket {
                return Err(BackendError::new(
                    ErrorCode::BucketNotFound,
                    format!("Bucket '{bucket}' does not exist."),
                )
                .with_status(404));
            }
        }
        Ok(self.clone())
    }
}

impl Fetch for MemoryObjectStore {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.shared.counters.increment(Operation::Fetch);
        let fault = self.current_fetch_fault();
        match &fault {
            Some(FetchFault::Status(status, text)) => {
                return Ok(FetchResponse::status(*status, text.clone()))
            }
            Some(FetchFault::Transport(message)) => {
                return Err(TransportError::Connect(message.clone()))
            }
            _ => {}
        }

        let Some(key) = self.key_for_url(url) else {
            return Err(TransportError::Connect(format!("unresolvable URL: {url}")));
        };
        let Some(data) = self.data(key) else {
            return Ok(FetchResponse::status(404, "Not Found"));
        };

        let chunks = self.chunked(&data);
        let body: BodyStream = match fault {
            Some(FetchFault::Interrupted(message)) => {
                let broken = stream::once(async move { Err(TransportError::Interrupted(message)) });
                stream::iter(chunks.into_iter().take(1).map(Ok))
                    .chain(broken)
                    .boxed()
            }
            _ => stream::iter(chunks.into_iter().map(Ok)).boxed(),
        };
        Ok(FetchResponse::ok(body))
    }
}
