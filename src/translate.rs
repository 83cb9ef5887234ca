//! Classification of backend failures into the filesystem error taxonomy
//!
//! | Backend signal                         | Context | Kind                    |
//! |----------------------------------------|---------|-------------------------|
//! | `object-not-found` or HTTP 404         | any     | `NotFound`              |
//! | `unauthorized` / `unauthenticated` / 403 | read  | `NotFound`              |
//! | anything else                          | write   | `NoModificationAllowed` |
//! | anything else                          | read    | `NotReadable`           |
//!
//! Permission failures on reads are reported as absence so that a client
//! without access cannot probe for the existence of objects.

use crate::error::{BackendError, Cause, ErrorCode, ErrorKind, FsError};

/// Whether the failed call was reading or modifying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    #[must_use]
    pub const fn from_write(write: bool) -> Self {
        if write {
            Self::Write
        } else {
            Self::Read
        }
    }
}

/// Kind for a backend error observed during `access`
#[must_use]
pub fn classify(error: &BackendError, access: Access) -> ErrorKind {
    if is_not_found(error) {
        return ErrorKind::NotFound;
    }
    match access {
        Access::Read if is_permission_denied(error) => ErrorKind::NotFound,
        Access::Read => ErrorKind::NotReadable,
        Access::Write => ErrorKind::NoModificationAllowed,
    }
}

/// Kind for a bare HTTP status returned by the download transfer
#[must_use]
pub const fn classify_status(status: u16) -> Option<ErrorKind> {
    match status {
        200 => None,
        403 | 404 => Some(ErrorKind::NotFound),
        _ => Some(ErrorKind::NotReadable),
    }
}

/// Whether the backend reports the object as absent
#[must_use]
pub fn is_not_found(error: &BackendError) -> bool {
    error.code == ErrorCode::ObjectNotFound || error.status == Some(404)
}

fn is_permission_denied(error: &BackendError) -> bool {
    matches!(
        error.code,
        ErrorCode::Unauthorized | ErrorCode::Unauthenticated
    ) || error.status == Some(403)
}

/// Translate a backend failure for `path` into an [`FsError`]
pub fn translate(repository: &str, path: &str, error: BackendError, access: Access) -> FsError {
    let kind = classify(&error, access);
    FsError::new(kind, repository, path, Some(Cause::Backend(error)))
}

/// Translate a synthetic failure that did not come from the backend
///
/// There is no backend code to inspect, so only the access direction decides
/// the kind.
pub fn translate_message(
    repository: &str,
    path: &str,
    message: impl Into<String>,
    access: Access,
) -> FsError {
    let kind = match access {
        Access::Read => ErrorKind::NotReadable,
        Access::Write => ErrorKind::NoModificationAllowed,
    };
    FsError::with_message(kind, repository, path, message)
}
