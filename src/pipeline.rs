//! Run orchestrator.
//!
//! Drives one run through its fixed sequence:
//!
//! ```text
//! Init → RegionResolved → [Scanned] → Summarized → AwaitingConfirmation
//!      → Deleting → Done
//!      | Declined
//! ```
//!
//! The run is split into [`DeletionRun::confirm`] and [`DeletionRun::delete`]
//! so a caller can install its interrupt handling only once the operator has
//! said yes. [`DeletionRun::run`] does both.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::aggregator::{AggregateState, Aggregator};
use crate::config::{ClientConfig, Config};
use crate::cost;
use crate::deleter::{DeletionExecutor, DeletionReport};
use crate::lister::VersionLister;
use crate::region::resolve_bucket_region;
use crate::reporter::{ConsoleReporter, ReportEvent, Reporter};
use crate::safety::{ConfirmationGate, GateState, PromptHandler, StdioPromptHandler};
use crate::storage::s3::S3StorageFactory;
use crate::storage::{Storage, StorageFactory};
use crate::types::error::S3rError;
use crate::types::token::RunCancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    RegionResolved,
    Scanned,
    Summarized,
    AwaitingConfirmation,
    Deleting,
    Done,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Declined,
    Completed(DeletionReport),
}

/// One bulk deletion run over a single bucket/prefix.
///
/// ## Usage
///
/// ```no_run
/// # async fn example() -> anyhow::Result<()> {
/// use s3r_rs::{Config, DeletionRun, RunOutcome, create_run_cancellation_token};
///
/// let config = Config::for_target("my-bucket", "logs/");
/// let mut run = DeletionRun::new(config, create_run_cancellation_token());
/// match run.run().await? {
///     RunOutcome::Declined => println!("nothing deleted"),
///     RunOutcome::Completed(report) => println!("{} deleted", report.deleted),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DeletionRun {
    config: Config,
    factory: Box<dyn StorageFactory>,
    prompt_handler: Box<dyn PromptHandler>,
    reporter: Arc<dyn Reporter>,
    cancellation_token: RunCancellationToken,
    state: RunState,
    storage: Option<Storage>,
    summary: Option<AggregateState>,
}

impl DeletionRun {
    /// A run against S3, prompting on stdin and reporting to stdout.
    pub fn new(config: Config, cancellation_token: RunCancellationToken) -> Self {
        let reporter = Arc::new(ConsoleReporter::stdout(config.target.clone()));
        Self::with_components(
            config,
            Box::new(S3StorageFactory),
            Box::new(StdioPromptHandler),
            reporter,
            cancellation_token,
        )
    }

    pub fn with_components(
        config: Config,
        factory: Box<dyn StorageFactory>,
        prompt_handler: Box<dyn PromptHandler>,
        reporter: Arc<dyn Reporter>,
        cancellation_token: RunCancellationToken,
    ) -> Self {
        Self {
            config,
            factory,
            prompt_handler,
            reporter,
            cancellation_token,
            state: RunState::Init,
            storage: None,
            summary: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Scan-pass totals, if the scan ran.
    pub fn summary(&self) -> Option<AggregateState> {
        self.summary
    }

    /// Resolve the region, optionally scan and summarize, then ask the operator.
    ///
    /// # Returns
    ///
    /// - `Ok(GateState::Confirmed)`: [`DeletionRun::delete`] may be called
    /// - `Ok(GateState::Declined)`: the run is over, nothing was deleted
    /// - `Err(_)`: region lookup, listing or input failure, or an empty target
    pub async fn confirm(&mut self) -> Result<GateState> {
        if self.state != RunState::Init {
            return Err(anyhow!("confirm() called in state {:?}", self.state));
        }

        let client_config = self.config.client_config.clone().unwrap_or_default();
        let storage = self.connect(&client_config).await?;
        self.state = RunState::RegionResolved;

        if self.config.skip_listing {
            debug!("listing skipped.");
        } else {
            self.scan(&storage).await?;
        }
        self.storage = Some(storage);

        self.state = RunState::AwaitingConfirmation;
        let mut gate = ConfirmationGate::new();
        let answer = gate.run(self.prompt_handler.as_ref(), &self.config.target)?;

        if answer == GateState::Declined {
            info!(path = self.config.target.to_string(), "deletion declined.");
            self.reporter.report(ReportEvent::Declined);
            self.state = RunState::Declined;
        }

        Ok(answer)
    }

    /// Run the delete pass. Only valid after [`DeletionRun::confirm`] returned `Confirmed`.
    pub async fn delete(&mut self) -> Result<DeletionReport> {
        if self.state != RunState::AwaitingConfirmation {
            return Err(anyhow!("delete() called in state {:?}", self.state));
        }
        let Some(storage) = self.storage.take() else {
            return Err(anyhow!("delete() called without a storage client"));
        };

        self.state = RunState::Deleting;
        info!(
            path = self.config.target.to_string(),
            "deletion confirmed."
        );

        let lister = VersionLister::new(
            dyn_clone::clone_box(&*storage),
            self.config.max_keys,
            self.cancellation_token.clone(),
        );
        let executor = DeletionExecutor::new(
            storage,
            self.reporter.clone(),
            self.cancellation_token.clone(),
        );
        let report = executor.run(lister).await?;

        self.state = RunState::Done;
        Ok(report)
    }

    pub async fn run(&mut self) -> Result<RunOutcome> {
        match self.confirm().await? {
            GateState::Confirmed => Ok(RunOutcome::Completed(self.delete().await?)),
            _ => Ok(RunOutcome::Declined),
        }
    }

    /// Bootstrap client, then a client bound to the bucket's own region.
    async fn connect(&self, client_config: &ClientConfig) -> Result<Storage> {
        let target = &self.config.target;

        let bootstrap = self.factory.create(target, client_config).await?;
        let region = resolve_bucket_region(&bootstrap, &target.bucket).await?;
        self.reporter.report(ReportEvent::RegionResolved {
            region: region.clone(),
        });

        let storage = self
            .factory
            .create(target, &client_config.with_region(&region))
            .await?;
        debug!(
            region = storage.region().unwrap_or_default(),
            "storage client bound to the bucket region."
        );

        Ok(storage)
    }

    async fn scan(&mut self, storage: &Storage) -> Result<()> {
        self.reporter.report(ReportEvent::ScanStarted);

        let mut lister = VersionLister::new(
            dyn_clone::clone_box(&**storage),
            self.config.max_keys,
            self.cancellation_token.clone(),
        );
        let mut aggregator = Aggregator::new(self.reporter.clone());
        while let Some(page) = lister.next_page().await? {
            aggregator.apply(&page);
        }
        let aggregate = aggregator.state();
        self.state = RunState::Scanned;
        self.summary = Some(aggregate);

        if aggregate.is_empty() {
            return Err(anyhow!(S3rError::EmptyTarget {
                target: self.config.target.to_string(),
            }));
        }

        let cost = cost::estimate(aggregate.version_bytes, self.config.price_per_gb_month);
        info!(
            pages = lister.pages_fetched(),
            records = aggregate.record_count(),
            versions = aggregate.version_count,
            delete_markers = aggregate.delete_marker_count,
            version_bytes = aggregate.version_bytes,
            monthly_cost = cost.monthly,
            "scan pass has been completed."
        );
        self.reporter.report(ReportEvent::Summary {
            target: self.config.target.clone(),
            aggregate,
            cost,
        });
        self.state = RunState::Summarized;

        Ok(())
    }
}
