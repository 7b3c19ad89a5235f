//! Operator-facing progress and summary output.
//!
//! Lines written here are the tool's user interface, separate from the
//! tracing log stream. The pipeline emits [`ReportEvent`]s; a [`Reporter`]
//! decides how to render them.

use std::io::Write;
use std::sync::Mutex;

use indicatif::HumanBytes;
use tracing::warn;

use crate::aggregator::AggregateState;
use crate::cost::CostEstimate;
use crate::deleter::DeletionReport;
use crate::types::{DeletionOutcome, ScanTarget};

#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    RegionResolved {
        region: String,
    },
    ScanStarted,
    PageScanned(AggregateState),
    Summary {
        target: ScanTarget,
        aggregate: AggregateState,
        cost: CostEstimate,
    },
    DeletionStarted,
    RecordDeleted {
        page: u64,
        outcome: DeletionOutcome,
    },
    PageDeleted(AggregateState),
    DeletionCompleted(DeletionReport),
    Declined,
}

pub trait Reporter: Send + Sync {
    fn report(&self, event: ReportEvent);
}

/// Plain line-oriented output, stdout by default.
pub struct ConsoleReporter {
    target: ScanTarget,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    pub fn new(target: ScanTarget, writer: Box<dyn Write + Send>) -> Self {
        Self {
            target,
            writer: Mutex::new(writer),
        }
    }

    pub fn stdout(target: ScanTarget) -> Self {
        Self::new(target, Box::new(std::io::stdout()))
    }

    fn render(&self, event: &ReportEvent) -> Vec<String> {
        match event {
            ReportEvent::RegionResolved { region } => {
                vec![format!("Bucket region: {region}")]
            }
            ReportEvent::ScanStarted => vec![format!("Scanning {} ...", self.target)],
            ReportEvent::PageScanned(state) => vec![
                format!(
                    "Page {}: {} ({}) objects so far",
                    state.page_count,
                    state.live_object_count,
                    HumanBytes(state.live_object_bytes)
                ),
                format!(
                    "Page {}: {} ({}) versions so far",
                    state.page_count,
                    state.version_count,
                    HumanBytes(state.version_bytes)
                ),
                format!(
                    "Page {}: {} delete markers so far",
                    state.page_count, state.delete_marker_count
                ),
            ],
            ReportEvent::Summary {
                target,
                aggregate,
                cost,
            } => vec![
                String::new(),
                format!("This path \"{target}\" contains:"),
                format!(
                    "  {} objects ({}, {} bytes)",
                    aggregate.live_object_count,
                    HumanBytes(aggregate.live_object_bytes),
                    aggregate.live_object_bytes
                ),
                format!(
                    "  {} versions ({}, {} bytes)",
                    aggregate.version_count,
                    HumanBytes(aggregate.version_bytes),
                    aggregate.version_bytes
                ),
                format!("  {} delete markers", aggregate.delete_marker_count),
                format!(
                    "Estimated storage cost: ${} per month (${} per day)",
                    dollars(cost.monthly),
                    dollars(cost.daily)
                ),
                String::new(),
            ],
            ReportEvent::DeletionStarted => vec![format!("Deleting {} ...", self.target)],
            ReportEvent::RecordDeleted { page, outcome } => {
                let location = format!(
                    "{}: s3://{}/{} | VersionId: {}",
                    outcome.kind, self.target.bucket, outcome.key, outcome.version_id
                );
                match &outcome.error {
                    None => vec![format!("P{page}: Deleted: {location}")],
                    Some(error) => vec![format!("P{page}: Failed: {location} | Error: {error}")],
                }
            }
            ReportEvent::PageDeleted(state) => vec![format!(
                "Page {}: {} versions and {} delete markers processed so far",
                state.page_count, state.version_count, state.delete_marker_count
            )],
            ReportEvent::DeletionCompleted(report) => vec![
                String::new(),
                format!(
                    "Done. {} deleted, {} failed ({} versions, {} delete markers, {}).",
                    report.deleted,
                    report.failed,
                    report.aggregate.version_count,
                    report.aggregate.delete_marker_count,
                    HumanBytes(report.aggregate.version_bytes)
                ),
            ],
            ReportEvent::Declined => vec!["Didn't think so...".to_string()],
        }
    }
}

/// Six decimals, widened to two significant digits for sub-micro amounts.
fn dollars(amount: f64) -> String {
    if !amount.is_finite() || amount <= 0.0 || amount >= 1e-6 {
        return format!("{amount:.6}");
    }
    let decimals = (-amount.log10()).floor() as usize + 2;
    format!("{amount:.decimals$}")
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: ReportEvent) {
        let lines = self.render(&event);

        let Ok(mut writer) = self.writer.lock() else {
            warn!("console reporter lock poisoned.");
            return;
        };
        for line in lines {
            if let Err(e) = writeln!(writer, "{line}") {
                warn!(error = e.to_string(), "failed to write report line.");
                return;
            }
        }
        if let Err(e) = writer.flush() {
            warn!(error = e.to_string(), "failed to flush report output.");
        }
    }
}
