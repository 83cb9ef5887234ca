//! Fetch trait: the runtime's native download transfer
//!
//! File content is not read through the object-store client. The adapter asks
//! the client for a retrieval URL and hands it to a [`Fetch`] implementation,
//! which returns an HTTP-like response with a streaming body.

use crate::error::TransportError;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Body of a fetch response
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Status line and body of a completed request
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    /// `None` when the response carried no body
    pub body: Option<BodyStream>,
}

impl FetchResponse {
    #[must_use]
    pub fn ok(body: BodyStream) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: None,
        }
    }
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Download transfer used for reads
pub trait Fetch: Send + Sync + 'static {
    /// Issue a GET for `url`
    ///
    /// # Errors
    ///
    /// Returns `Err(TransportError)` only when no status was obtained; HTTP
    /// failures are reported through [`FetchResponse::status`].
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}
