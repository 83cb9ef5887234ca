//! Error types for the object-store filesystem
//!
//! Two layers of errors exist:
//!
//! - [`BackendError`] and [`TransportError`] are what the collaborators (the
//!   object-store client and the download transfer) report. They never cross
//!   the adapter boundary on their own.
//! - [`FsError`] is the only error a caller sees. Every backend failure is
//!   classified into an [`ErrorKind`] by [`crate::translate`] at the call site.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the adapter
pub type Result<T> = std::result::Result<T, FsError>;

/// Result alias for object-store client calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Generic filesystem error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path does not exist
    NotFound,
    /// Reading failed for a reason other than absence
    NotReadable,
    /// A write or delete failed
    NoModificationAllowed,
    /// The operation targets the wrong kind of entry
    TypeMismatch,
}

impl ErrorKind {
    /// Stable name of the kind, matching the generic filesystem contract
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::NotReadable => "NotReadableError",
            Self::NoModificationAllowed => "NoModificationAllowedError",
            Self::TypeMismatch => "TypeMismatchError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Native error codes reported by the object-store client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ObjectNotFound,
    BucketNotFound,
    Unauthorized,
    Unauthenticated,
    QuotaExceeded,
    Canceled,
    Unknown,
    /// Any code this crate does not classify specifically
    Other(String),
}

impl ErrorCode {
    /// Parse a backend code such as `storage/object-not-found`
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "storage/object-not-found" => Self::ObjectNotFound,
            "storage/bucket-not-found" => Self::BucketNotFound,
            "storage/unauthorized" => Self::Unauthorized,
            "storage/unauthenticated" => Self::Unauthenticated,
            "storage/quota-exceeded" => Self::QuotaExceeded,
            "storage/canceled" => Self::Canceled,
            "storage/unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ObjectNotFound => "storage/object-not-found",
            Self::BucketNotFound => "storage/bucket-not-found",
            Self::Unauthorized => "storage/unauthorized",
            Self::Unauthenticated => "storage/unauthenticated",
            Self::QuotaExceeded => "storage/quota-exceeded",
            Self::Canceled => "storage/canceled",
            Self::Unknown => "storage/unknown",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by the object-store client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} ({code})")]
pub struct BackendError {
    /// Native error code
    pub code: ErrorCode,
    /// HTTP status of the failed request, when the client exposes one
    pub status: Option<u16>,
    /// Human readable message
    pub message: String,
}

impl BackendError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Object missing at `key`
    pub fn object_not_found(key: &str) -> Self {
        Self::new(
            ErrorCode::ObjectNotFound,
            format!("Object '{key}' does not exist."),
        )
        .with_status(404)
    }

    /// Caller lacks permission for `key`
    pub fn unauthorized(key: &str) -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            format!("User does not have permission to access '{key}'."),
        )
        .with_status(403)
    }

    /// Catch-all server failure
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message).with_status(500)
    }
}

/// Failure of the download transfer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No HTTP status was obtained (DNS, connection reset, bad URL, ...)
    #[error("transfer failed: {0}")]
    Connect(String),
    /// The body stream broke after the status line was received
    #[error("transfer interrupted: {0}")]
    Interrupted(String),
}

/// Underlying reason attached to an [`FsError`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Cause {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Message(String),
}

/// Error returned by every filesystem operation
#[derive(Debug, Clone, Error)]
pub enum FsError {
    /// A classified failure for a path in a repository
    #[error("{kind}: {repository}:{path}{}", cause_suffix(.cause))]
    Entry {
        kind: ErrorKind,
        repository: String,
        path: String,
        #[source]
        cause: Option<Cause>,
    },

    /// The one-time root provisioning failed; no path context applies
    #[error("failed to provision repository root for {repository}")]
    Bootstrap {
        repository: String,
        #[source]
        source: BackendError,
    },
}

fn cause_suffix(cause: &Option<Cause>) -> String {
    cause.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl FsError {
    pub fn new(
        kind: ErrorKind,
        repository: impl Into<String>,
        path: impl Into<String>,
        cause: Option<Cause>,
    ) -> Self {
        Self::Entry {
            kind,
            repository: repository.into(),
            path: path.into(),
            cause,
        }
    }

    /// Error with a synthetic message as its cause
    pub fn with_message(
        kind: ErrorKind,
        repository: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, repository, path, Some(Cause::Message(message.into())))
    }

    /// Classified kind, `None` for bootstrap failures
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Entry { kind, .. } => Some(*kind),
            Self::Bootstrap { .. } => None,
        }
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Entry { repository, .. } | Self::Bootstrap { repository, .. } => repository,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Entry { path, .. } => Some(path),
            Self::Bootstrap { .. } => None,
        }
    }

    #[must_use]
    pub const fn cause(&self) -> Option<&Cause> {
        match self {
            Self::Entry { cause, .. } => cause.as_ref(),
            Self::Bootstrap { .. } => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    /// Whether the backend confirmed that nothing exists at the path
    ///
    /// Permission failures on reads are also reported as `NotFound`, but the
    /// entry may well exist; those are not absent.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Entry {
                kind: ErrorKind::NotFound,
                cause,
                ..
            } => match cause {
                None => true,
                Some(Cause::Backend(e)) => crate::translate::is_not_found(e),
                Some(Cause::Transport(_) | Cause::Message(_)) => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_round_trip_known_codes() {
        for code in [
            "storage/object-not-found",
            "storage/unauthorized",
            "storage/unauthenticated",
            "storage/unknown",
        ] {
            assert_eq!(ErrorCode::parse(code).as_str(), code);
        }
        assert_eq!(
            ErrorCode::parse("storage/retry-limit-exceeded"),
            ErrorCode::Other("storage/retry-limit-exceeded".to_string())
        );
    }

    #[test]
    fn test_fs_error_display_includes_cause() {
        let err = FsError::with_message(ErrorKind::NotReadable, "repo", "/a.txt", "boom");
        assert_eq!(err.to_string(), "NotReadableError: repo:/a.txt (boom)");

        let bare = FsError::new(ErrorKind::NotFound, "repo", "/a.txt", None);
        assert_eq!(bare.to_string(), "NotFoundError: repo:/a.txt");
        assert!(bare.is_not_found());
    }

    #[test]
    fn test_bootstrap_error_has_no_kind() {
        let err = FsError::Bootstrap {
            repository: "repo".to_string(),
            source: BackendError::unknown("down"),
        };
        assert_eq!(err.kind(), None);
        assert_eq!(err.path(), None);
        assert_eq!(err.repository(), "repo");
        assert!(!err.is_absent());
    }

    #[test]
    fn test_permission_denied_not_found_is_not_absent() {
        let missing = FsError::new(
            ErrorKind::NotFound,
            "repo",
            "/a",
            Some(Cause::Backend(BackendError::object_not_found("repo/a"))),
        );
        assert!(missing.is_absent());

        let denied = FsError::new(
            ErrorKind::NotFound,
            "repo",
            "/a",
            Some(Cause::Backend(BackendError::unauthorized("repo/a"))),
        );
        assert!(denied.is_not_found());
        assert!(!denied.is_absent());

        let forbidden = FsError::with_message(ErrorKind::NotFound, "repo", "/a", "Forbidden (403)");
        assert!(!forbidden.is_absent());

        let unreadable = FsError::new(ErrorKind::NotReadable, "repo", "/a", None);
        assert!(!unreadable.is_absent());
    }
}
