//! Binary payloads for uploads and byte streams for downloads
//!
//! Uploads come in two representations. A server runtime hands the client a
//! single contiguous buffer; a browser-like runtime hands it a blob assembled
//! from parts, which is never flattened on the client side. Which one is used
//! is decided once by [`TransferMode`], not at each call site.

use crate::error::Result;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// Lazily consumed, single-pass stream of file content
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Upload buffer representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TransferMode {
    /// One contiguous byte buffer
    #[default]
    Buffered,
    /// A list of parts uploaded as one object (blob semantics)
    Segmented,
}

/// Data handed to the object store for a single upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Buffer(Bytes),
    Segments(Vec<Bytes>),
}

impl Payload {
    #[must_use]
    pub const fn empty() -> Self {
        Self::Buffer(Bytes::new())
    }

    /// Payload for a write, with optional existing content placed in front
    #[must_use]
    pub fn compose(mode: TransferMode, head: Option<Bytes>, data: Bytes) -> Self {
        match mode {
            TransferMode::Buffered => match head {
                Some(head) if !head.is_empty() => {
                    let mut buf = BytesMut::with_capacity(head.len() + data.len());
                    buf.extend_from_slice(&head);
                    buf.extend_from_slice(&data);
                    Self::Buffer(buf.freeze())
                }
                _ => Self::Buffer(data),
            },
            TransferMode::Segmented => {
                let parts = head
                    .into_iter()
                    .chain(std::iter::once(data))
                    .filter(|part| !part.is_empty())
                    .collect();
                Self::Segments(parts)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Buffer(buf) => buf.len(),
            Self::Segments(parts) => parts.iter().map(Bytes::len).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into one buffer (done by the store, not the adapter)
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Buffer(buf) => buf,
            Self::Segments(mut parts) if parts.len() == 1 => parts.remove(0),
            Self::Segments(parts) => {
                let mut buf = BytesMut::with_capacity(parts.iter().map(Bytes::len).sum());
                for part in &parts {
                    buf.extend_from_slice(part);
                }
                buf.freeze()
            }
        }
    }
}

impl From<Bytes> for Payload {
    fn from(buf: Bytes) -> Self {
        Self::Buffer(buf)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(buf: Vec<u8>) -> Self {
        Self::Buffer(Bytes::from(buf))
    }
}

/// Stream over an in-memory buffer
#[must_use]
pub fn once(data: Bytes) -> ByteStream {
    stream::once(async move { Ok(data) }).boxed()
}

/// Drain a stream into one buffer
///
/// # Errors
///
/// Returns the first error the stream yields.
pub async fn collect(stream: ByteStream) -> Result<Bytes> {
    let buf = stream
        .try_fold(BytesMut::new(), |mut acc, chunk| async move {
            acc.extend_from_slice(&chunk);
            Ok(acc)
        })
        .await?;
    Ok(buf.freeze())
}
