//! Logical path helpers
//!
//! Logical paths are absolute, `/`-separated and never end with a separator
//! (except the root itself).

use crate::key::SEPARATOR;

/// Normalize `path` to `/a/b` form; `""` and `"/"` become `"/"`
#[must_use]
pub fn normalize(path: &str) -> String {
    let joined = path
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

/// Append `name` to `parent`
#[must_use]
pub fn join(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    if parent == "/" {
        normalize(name)
    } else {
        normalize(&format!("{parent}/{name}"))
    }
}

/// Parent of `path`, `None` for the root
#[must_use]
pub fn parent(path: &str) -> Option<String> {
    let path = normalize(path);
    if path == "/" {
        return None;
    }
    match path.rfind(SEPARATOR) {
        Some(0) | None => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
    }
}

/// Whether `path` is the root
#[must_use]
pub fn is_root(path: &str) -> bool {
    normalize(path) == "/"
}
