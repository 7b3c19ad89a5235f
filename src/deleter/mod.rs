//! Second-pass deletion of every version and delete marker.
//!
//! Re-enumerates the prefix from the beginning and issues exactly one
//! DeleteObject call per record, with the record's version id. A failed
//! delete is logged and counted but never aborts the pass; a failed listing
//! does. There is no retry beyond the SDK's own and no rollback.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use crate::aggregator::AggregateState;
use crate::lister::VersionLister;
use crate::reporter::{ReportEvent, Reporter};
use crate::storage::Storage;
use crate::types::error::S3rError;
use crate::types::token::RunCancellationToken;
use crate::types::{DeletionOutcome, RecordKind};


/// Completion report of a delete pass.
///
/// `aggregate` is the delete pass's own tally, started from zero regardless
/// of whether a scan pass ran before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: u64,
    pub failed: u64,
    pub aggregate: AggregateState,
}

impl DeletionReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

pub struct DeletionExecutor {
    storage: Storage,
    reporter: Arc<dyn Reporter>,
    cancellation_token: RunCancellationToken,
}

impl DeletionExecutor {
    pub fn new(
        storage: Storage,
        reporter: Arc<dyn Reporter>,
        cancellation_token: RunCancellationToken,
    ) -> Self {
        Self {
            storage,
            reporter,
            cancellation_token,
        }
    }

    /// Drain `lister`, deleting every record it yields.
    pub async fn run(&self, mut lister: VersionLister) -> Result<DeletionReport> {
        let mut report = DeletionReport::default();

        self.reporter.report(ReportEvent::DeletionStarted);
        debug!("delete pass has started.");

        while let Some(page) = lister.next_page().await? {
            report.aggregate.add_page(&page);
            let page_number = report.aggregate.page_count;

            for version in &page.versions {
                self.delete_record(
                    &mut report,
                    page_number,
                    RecordKind::Version,
                    &version.key,
                    &version.version_id,
                )
                .await?;
            }
            for marker in &page.delete_markers {
                self.delete_record(
                    &mut report,
                    page_number,
                    RecordKind::DeleteMarker,
                    &marker.key,
                    &marker.version_id,
                )
                .await?;
            }

            self.reporter
                .report(ReportEvent::PageDeleted(report.aggregate));
        }

        info!(
            deleted = report.deleted,
            failed = report.failed,
            pages = report.aggregate.page_count,
            "delete pass has been completed."
        );
        self.reporter.report(ReportEvent::DeletionCompleted(report));

        Ok(report)
    }

    async fn delete_record(
        &self,
        report: &mut DeletionReport,
        page: u64,
        kind: RecordKind,
        key: &str,
        version_id: &str,
    ) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            info!(
                deleted = report.deleted,
                failed = report.failed,
                "delete pass cancelled."
            );
            return Err(anyhow!(S3rError::Cancelled));
        }

        debug!(key = key, version_id = version_id, "sending DeleteObject request.");

        let outcome = match self.storage.delete_object_version(key, version_id).await {
            Ok(()) => {
                report.deleted += 1;
                DeletionOutcome::success(kind, key, version_id)
            }
            Err(e) => {
                warn!(
                    key = key,
                    version_id = version_id,
                    error = format!("{e:#}"),
                    "DeleteObject failed for key '{}'.",
                    key
                );
                report.failed += 1;
                DeletionOutcome::failure(kind, key, version_id, format!("{e:#}"))
            }
        };

        self.reporter
            .report(ReportEvent::RecordDeleted { page, outcome });
        Ok(())
    }
}
