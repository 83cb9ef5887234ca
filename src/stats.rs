//! Normalized entry metadata
//!
//! [`Stats`] is the backend-agnostic view of an entry. User attributes are kept
//! in an [`Attributes`] map and stored as the backend's custom string metadata.
//! The keys the backend already tracks natively (`size`, `etag`, `created`,
//! `modified`) are never written into custom metadata.

use crate::traits::ObjectMetadata;
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Attribute names the backend records as first-class fields
pub const RESERVED_ATTRIBUTES: [&str; 4] = ["size", "etag", "created", "modified"];

/// User-defined string attributes of an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, stringifying the value
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Custom metadata to store on the backend, reserved keys excluded
    #[must_use]
    pub fn to_custom_metadata(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(key, _)| !RESERVED_ATTRIBUTES.contains(&key.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<BTreeMap<String, String>> for Attributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Metadata of a resolved entry
///
/// Directories never carry a `size`; an implicit directory (one that exists
/// only because objects live under its prefix) carries nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub size: Option<u64>,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub etag: Option<String>,
    pub attributes: Attributes,
}

impl Stats {
    /// Build stats from backend object metadata
    #[must_use]
    pub fn from_object(object: &ObjectMetadata, is_directory: bool) -> Self {
        let mut attributes = Attributes::from(object.custom_metadata.clone());
        for key in RESERVED_ATTRIBUTES {
            attributes.remove(key);
        }
        Self {
            size: (!is_directory).then_some(object.size),
            created: object.time_created,
            modified: object.updated,
            etag: object.md5_hash.clone().filter(|hash| !hash.is_empty()),
            attributes,
        }
    }

    /// Stats of a directory inferred from its children
    #[must_use]
    pub fn implicit_directory() -> Self {
        Self::default()
    }

    /// Whether these stats describe a file (only files report a size)
    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.size.is_some()
    }

    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.size.is_none()
    }
}
