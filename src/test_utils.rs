//! Shared test utilities for the s3r library crate.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::reporter::{ReportEvent, Reporter};
use crate::safety::PromptHandler;
use crate::storage::{Storage, StorageFactory, StorageTrait};
use crate::types::{DeleteMarkerRecord, ObjectVersionRecord, Page, PageCursor, ScanTarget};

const CURSOR_PREFIX: &str = "page-";

/// Initialise a dummy tracing subscriber for tests.
///
/// Uses `try_init` so that only the first call in a process actually
/// installs the subscriber; subsequent calls are silently ignored.
pub(crate) fn init_dummy_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dummy=trace")
        .try_init();
}

pub(crate) fn make_version(
    key: &str,
    version_id: &str,
    is_latest: bool,
    size_bytes: i64,
) -> ObjectVersionRecord {
    ObjectVersionRecord {
        key: key.to_string(),
        version_id: version_id.to_string(),
        is_latest,
        size_bytes,
    }
}

pub(crate) fn make_delete_marker(key: &str, version_id: &str) -> DeleteMarkerRecord {
    DeleteMarkerRecord {
        key: key.to_string(),
        version_id: version_id.to_string(),
    }
}

/// A final (non-truncated) page. [`MockStorage::new`] fixes up truncation and cursors.
pub(crate) fn make_page(
    versions: Vec<ObjectVersionRecord>,
    delete_markers: Vec<DeleteMarkerRecord>,
) -> Page {
    Page {
        versions,
        delete_markers,
        is_truncated: false,
        next_cursor: None,
    }
}

#[derive(Default)]
struct MockStorageState {
    list_cursors: Vec<Option<PageCursor>>,
    last_max_keys: Option<i32>,
    delete_calls: Vec<(String, String)>,
}

/// In-memory storage serving a fixed list of pages.
///
/// Page `n` is addressed by the key marker `page-n`. Clones share call records.
#[derive(Clone)]
pub(crate) struct MockStorage {
    pages: Arc<Vec<Page>>,
    location: Option<String>,
    location_error: bool,
    listing_error_at: Option<usize>,
    failing_deletes: Arc<HashSet<(String, String)>>,
    state: Arc<Mutex<MockStorageState>>,
}

impl MockStorage {
    /// Serve `pages` in order, marking every page but the last as truncated.
    pub(crate) fn new(pages: Vec<Page>) -> Self {
        let page_count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, mut page)| {
                let is_last = index + 1 >= page_count;
                page.is_truncated = !is_last;
                page.next_cursor = (!is_last).then(|| PageCursor {
                    key_marker: Some(format!("{CURSOR_PREFIX}{}", index + 1)),
                    version_id_marker: Some(format!("vid-{}", index + 1)),
                });
                page
            })
            .collect();
        Self::with_raw_pages(pages)
    }

    /// Serve `pages` exactly as given.
    pub(crate) fn with_raw_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: Arc::new(pages),
            location: None,
            location_error: false,
            listing_error_at: None,
            failing_deletes: Arc::new(HashSet::new()),
            state: Arc::new(Mutex::new(MockStorageState::default())),
        }
    }

    pub(crate) fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location.map(String::from);
        self
    }

    pub(crate) fn with_location_error(mut self) -> Self {
        self.location_error = true;
        self
    }

    pub(crate) fn with_listing_error_at(mut self, page_index: usize) -> Self {
        self.listing_error_at = Some(page_index);
        self
    }

    pub(crate) fn with_failing_delete(mut self, key: &str, version_id: &str) -> Self {
        let mut failing = (*self.failing_deletes).clone();
        failing.insert((key.to_string(), version_id.to_string()));
        self.failing_deletes = Arc::new(failing);
        self
    }

    pub(crate) fn list_cursors(&self) -> Vec<Option<PageCursor>> {
        self.state.lock().unwrap().list_cursors.clone()
    }

    pub(crate) fn last_max_keys(&self) -> Option<i32> {
        self.state.lock().unwrap().last_max_keys
    }

    pub(crate) fn delete_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().delete_calls.clone()
    }

    fn page_index(cursor: Option<&PageCursor>) -> Result<usize> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };
        cursor
            .key_marker
            .as_deref()
            .and_then(|marker| marker.strip_prefix(CURSOR_PREFIX))
            .and_then(|index| index.parse().ok())
            .ok_or_else(|| anyhow!("unknown cursor: {cursor:?}"))
    }
}

#[async_trait]
impl StorageTrait for MockStorage {
    async fn get_bucket_location(&self) -> Result<Option<String>> {
        if self.location_error {
            return Err(anyhow!("AccessDenied: Access Denied"));
        }
        Ok(self.location.clone())
    }

    async fn list_object_versions_page(
        &self,
        cursor: Option<&PageCursor>,
        max_keys: i32,
    ) -> Result<Page> {
        {
            let mut state = self.state.lock().unwrap();
            state.list_cursors.push(cursor.cloned());
            state.last_max_keys = Some(max_keys);
        }

        let index = Self::page_index(cursor)?;
        if self.listing_error_at == Some(index) {
            return Err(anyhow!("InternalError: We encountered an internal error."));
        }

        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn delete_object_version(&self, key: &str, version_id: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .delete_calls
            .push((key.to_string(), version_id.to_string()));

        if self
            .failing_deletes
            .contains(&(key.to_string(), version_id.to_string()))
        {
            return Err(anyhow!("AccessDenied: Access Denied"));
        }
        Ok(())
    }

    fn region(&self) -> Option<String> {
        None
    }
}

/// Factory handing out clones of one [`MockStorage`] and recording the regions asked for.
#[derive(Clone)]
pub(crate) struct MockStorageFactory {
    storage: MockStorage,
    regions: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockStorageFactory {
    pub(crate) fn new(storage: MockStorage) -> Self {
        Self {
            storage,
            regions: Arc::new(Mutex::new(vec![])),
        }
    }

    pub(crate) fn requested_regions(&self) -> Vec<Option<String>> {
        self.regions.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageFactory for MockStorageFactory {
    async fn create(&self, _target: &ScanTarget, client_config: &ClientConfig) -> Result<Storage> {
        self.regions
            .lock()
            .unwrap()
            .push(client_config.region.clone());
        Ok(Box::new(self.storage.clone()))
    }
}

/// Reporter that keeps every event.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Prompt handler replaying canned lines; end of input once they run out.
pub(crate) struct ScriptedPromptHandler {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    reads: Arc<AtomicUsize>,
    read_error: bool,
}

impl ScriptedPromptHandler {
    pub(crate) fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(vec![]),
            reads: Arc::new(AtomicUsize::new(0)),
            read_error: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            read_error: true,
            ..Self::new(&[])
        }
    }

    pub(crate) fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl PromptHandler for ScriptedPromptHandler {
    fn read_confirmation(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.read_error {
            return Err(anyhow!("stdin closed unexpectedly"));
        }
        Ok(self.responses.lock().unwrap().pop_front())
    }
}
