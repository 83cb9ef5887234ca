//! Mapping between logical paths and object-store keys
//!
//! Keys are `repository + "/" + path`, with a trailing separator when the key
//! names a directory placeholder. The root path maps to the bare repository.
//! Only the last segment of a key ever needs to be recovered (for listings),
//! so the mapping is not fully reversible.

/// Key and path separator
pub const SEPARATOR: char = '/';

/// Object-store key for `path` under `repository`
///
/// The empty path and `"/"` map to the repository itself. Empty segments are
/// collapsed; no other validation or encoding happens here.
#[must_use]
pub fn to_key(repository: &str, path: &str, is_directory: bool) -> String {
    let mut key = segments(repository).collect::<Vec<_>>().join("/");
    for segment in segments(path) {
        key.push(SEPARATOR);
        key.push_str(segment);
    }
    if is_directory {
        key.push(SEPARATOR);
    }
    key
}

/// Name of the immediate child a listed key refers to
///
/// Directory prefixes end with the separator, so their name is the
/// second-to-last segment; item keys use the last one.
#[must_use]
pub fn child_name(key: &str, is_directory: bool) -> Option<&str> {
    let mut parts = key.rsplit(SEPARATOR);
    if is_directory {
        parts.next()?;
    }
    parts.next().filter(|name| !name.is_empty())
}

fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(SEPARATOR).filter(|segment| !segment.is_empty())
}
