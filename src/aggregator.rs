//! Running totals over version listing pages.

use std::sync::Arc;

use crate::reporter::{ReportEvent, Reporter};
use crate::types::Page;

#[cfg(test)]
mod aggregator_properties;

/// Counts and byte totals accumulated page by page.
///
/// Only ever grows. `live_object_count <= version_count` and
/// `live_object_bytes <= version_bytes` hold after every page, since live
/// objects are the subset of versions flagged latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub page_count: u64,
    pub version_count: u64,
    pub delete_marker_count: u64,
    pub live_object_count: u64,
    pub version_bytes: u64,
    pub live_object_bytes: u64,
}

impl AggregateState {
    /// Add one page to the totals.
    pub fn add_page(&mut self, page: &Page) {
        self.page_count += 1;
        self.version_count += page.versions.len() as u64;
        self.delete_marker_count += page.delete_markers.len() as u64;

        for version in &page.versions {
            let size = version.size();
            self.version_bytes += size;
            if version.is_latest {
                self.live_object_count += 1;
                self.live_object_bytes += size;
            }
        }
    }

    /// Versions plus delete markers: the number of DeleteObject calls a full pass issues.
    pub fn record_count(&self) -> u64 {
        self.version_count + self.delete_marker_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_object_count + self.version_count + self.delete_marker_count == 0
    }
}

/// Pure accumulation step.
pub fn apply(mut state: AggregateState, page: &Page) -> AggregateState {
    state.add_page(page);
    state
}

/// Owns the running totals of one pass and reports progress after each page.
pub struct Aggregator {
    state: AggregateState,
    reporter: Arc<dyn Reporter>,
}

impl Aggregator {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            state: AggregateState::default(),
            reporter,
        }
    }

    pub fn apply(&mut self, page: &Page) -> AggregateState {
        self.state = apply(self.state, page);
        self.reporter.report(ReportEvent::PageScanned(self.state));
        self.state
    }

    pub fn state(&self) -> AggregateState {
        self.state
    }
}
