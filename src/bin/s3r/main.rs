use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, error, info, trace, warn};

use s3r_rs::config::Config;
use s3r_rs::{
    CLIArgs, DeletionRun, GateState, create_run_cancellation_token, exit_code_from_error,
    is_cancelled_error,
};

mod ctrl_c_handler;
mod tracing_init;

/// s3r - delete every version and delete marker under an S3 prefix.
///
/// This binary is a thin wrapper over the s3r-rs library.
#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(shell, &mut CLIArgs::command(), "s3r", &mut std::io::stdout());
        return;
    }

    let tracing_started = start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    if let Err(e) = run(config).await {
        if is_cancelled_error(&e) {
            info!("deletion cancelled by user.");
        } else if tracing_started {
            error!("{:#}", e);
        } else {
            eprintln!("{e:#}");
        }
        std::process::exit(exit_code_from_error(&e));
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err() -> Config {
    match Config::try_from(CLIArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

async fn run(config: Config) -> Result<()> {
    let cancellation_token = create_run_cancellation_token();

    let start_time = tokio::time::Instant::now();
    debug!("s3r run start.");

    let mut run = DeletionRun::new(config, cancellation_token.clone());
    if run.confirm().await? != GateState::Confirmed {
        return Ok(());
    }

    ctrl_c_handler::spawn_ctrl_c_handler(cancellation_token);
    let report = run.delete().await?;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    debug!(
        duration_sec = duration_sec,
        deleted = report.deleted,
        failed = report.failed,
        "s3r has been completed."
    );
    if report.has_failures() {
        warn!(
            failed = report.failed,
            "some versions could not be deleted."
        );
    }

    Ok(())
}
