use anyhow::{Result, anyhow};
use tracing::{debug, info, trace};

use crate::storage::Storage;
use crate::types::error::S3rError;
use crate::types::token::RunCancellationToken;
use crate::types::{Page, PageCursor};

/// Forward-only sequence of ListObjectVersions pages under one prefix.
///
/// Threads `(key_marker, version_id_marker)` from each truncated page into
/// the next request. Once the last page has been returned (or a call failed)
/// every further `next_page` yields `Ok(None)`. A lister cannot be rewound:
/// the scan pass and the delete pass each create their own.
///
/// The namespace is not locked, so two listers over the same prefix may see
/// different sets of versions, in particular when the delete pass removes the
/// records it is enumerating.
pub struct VersionLister {
    storage: Storage,
    max_keys: i32,
    cancellation_token: RunCancellationToken,
    cursor: Option<PageCursor>,
    finished: bool,
    pages_fetched: u64,
}

impl VersionLister {
    pub fn new(storage: Storage, max_keys: i32, cancellation_token: RunCancellationToken) -> Self {
        Self {
            storage,
            max_keys,
            cancellation_token,
            cursor: None,
            finished: false,
            pages_fetched: 0,
        }
    }

    /// Fetch the next page, or `None` at end of stream.
    ///
    /// Cancellation is checked before each request; a request already sent
    /// always completes.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.finished {
            return Ok(None);
        }

        if self.cancellation_token.is_cancelled() {
            info!("version listing cancelled.");
            self.finished = true;
            return Err(anyhow!(S3rError::Cancelled));
        }

        let result = self
            .storage
            .list_object_versions_page(self.cursor.as_ref(), self.max_keys)
            .await;
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e.context(S3rError::Listing(format!(
                    "page {} request failed",
                    self.pages_fetched + 1
                ))));
            }
        };
        self.pages_fetched += 1;

        trace!(
            page = self.pages_fetched,
            versions = page.versions.len(),
            delete_markers = page.delete_markers.len(),
            is_truncated = page.is_truncated,
            "version page received."
        );

        if page.is_truncated {
            match page.next_cursor.as_ref() {
                Some(cursor) if !cursor.is_empty() => self.cursor = Some(cursor.clone()),
                _ => {
                    self.finished = true;
                    return Err(anyhow!(S3rError::Listing(format!(
                        "page {} is truncated but has no continuation marker",
                        self.pages_fetched
                    ))));
                }
            }
        } else {
            debug!(pages = self.pages_fetched, "version listing has been completed.");
            self.finished = true;
        }

        Ok(Some(page))
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }
}
