/*!
# Overview
s3r-rs removes every object version and delete marker under an S3 prefix.

A run resolves the bucket's region, scans the prefix once to count versions,
delete markers and bytes, prints a storage cost estimate, and then asks the
operator to type `yes`. Only then does a second pass list the prefix again
and delete each record by version id, one DeleteObject call at a time.

## Features
- **Version-aware**: deletes every historical version and every delete marker, not just the current object
- **Scan first**: counts and a monthly/daily cost projection before anything is touched (skip with `--no`)
- **Always confirmed**: no force flag; deletion only after an explicit `yes`
- **Best effort**: a failed delete is logged and counted, the pass moves on
- **Library-First**: the s3r CLI is a thin wrapper over this crate

## As a Library

```toml
[dependencies]
s3r-rs = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
use s3r_rs::config::Config;
use s3r_rs::config::args::parse_from_args;
use s3r_rs::pipeline::{DeletionRun, RunOutcome};
use s3r_rs::types::token::create_run_cancellation_token;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = vec!["s3r", "my-bucket", "logs/2023/"];

    let parsed_args = parse_from_args(args)?;
    let config = Config::try_from(parsed_args).map_err(anyhow::Error::msg)?;
    let mut run = DeletionRun::new(config, create_run_cancellation_token());

    if let RunOutcome::Completed(report) = run.run().await? {
        println!("{} deleted, {} failed", report.deleted, report.failed);
    }
    Ok(())
}
```
*/

#![allow(clippy::collapsible_if)]

pub mod aggregator;
pub mod config;
pub mod cost;
pub mod deleter;
pub mod lister;
pub mod pipeline;
pub mod region;
pub mod reporter;
pub mod safety;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use aggregator::AggregateState;
pub use config::Config;
pub use config::args::CLIArgs;
pub use cost::CostEstimate;
pub use deleter::DeletionReport;
pub use pipeline::{DeletionRun, RunOutcome, RunState};
pub use reporter::{ReportEvent, Reporter};
pub use safety::{GateState, PromptHandler};
pub use storage::{Storage, StorageFactory, StorageTrait};
pub use types::error::{
    S3rError, exit_code_from_error, is_cancelled_error, is_empty_target_error,
};
pub use types::token::{RunCancellationToken, create_run_cancellation_token};
pub use types::{
    DeleteMarkerRecord, DeletionOutcome, ObjectVersionRecord, Page, PageCursor, RecordKind,
    ScanTarget,
};
