//! File downloads
//!
//! Content is never read through the store client. The file's retrieval URL
//! is resolved first and then fetched with the injected [`Fetch`] transfer,
//! whose body is handed to the caller as a lazily consumed stream.

use crate::error::{Cause, ErrorKind, FsError, Result};
use crate::payload::ByteStream;
use crate::traits::{Connect, EntryKind, Fetch, UrlMethod};
use crate::translate;
use futures::{StreamExt, TryStreamExt};
use tracing::debug;

use super::ObjectFileSystem;

impl<C: Connect, F: Fetch> ObjectFileSystem<C, F> {
    /// Open the content of the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The file or its URL does not exist, or the transfer answers 404/403 (`NotFound`)
    /// - Any other non-200 status, or no body (`NotReadable`, status text included)
    /// - The transfer fails before a status is obtained (`NotReadable`)
    ///
    /// Failures while the returned stream is consumed surface as `NotReadable`
    /// items of the stream.
    pub(crate) async fn open_read(&self, path: &str) -> Result<ByteStream> {
        let url = self.entry_url(path, EntryKind::File, UrlMethod::Get).await?;
        debug!("Fetching {} from {}", path, url);

        let response = self.fetcher().fetch(&url).await.map_err(|e| {
            FsError::new(
                ErrorKind::NotReadable,
                self.repository_name(),
                path,
                Some(Cause::Transport(e)),
            )
        })?;

        match translate::classify_status(response.status) {
            Some(ErrorKind::NotFound) if response.status == 404 => {
                return Err(FsError::new(
                    ErrorKind::NotFound,
                    self.repository_name(),
                    path,
                    None,
                ))
            }
            Some(kind) => {
                return Err(self.fail(
                    kind,
                    path,
                    format!("{} ({})", response.status_text, response.status),
                ))
            }
            None => {}
        }

        let Some(body) = response.body else {
            return Err(self.fail(
                ErrorKind::NotReadable,
                path,
                format!("{} ({}): empty body", response.status_text, response.status),
            ));
        };

        let repository = self.repository_name().to_string();
        let path = path.to_string();
        Ok(body
            .map_err(move |e| {
                FsError::new(
                    ErrorKind::NotReadable,
                    repository.as_str(),
                    path.as_str(),
                    Some(Cause::Transport(e)),
                )
            })
            .boxed())
    }
}
