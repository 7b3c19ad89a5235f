// Ctrl+C signal handler.
//
// Uses tokio::select! to wait for either run cancellation or Ctrl+C signal.
// Installed only once deletion has been confirmed; before that the default
// SIGINT behavior terminates the process while nothing has been deleted.

use s3r_rs::RunCancellationToken;
use tokio::task::JoinHandle;
use tokio::{select, signal};
use tracing::{debug, warn};

pub fn spawn_ctrl_c_handler(cancellation_token: RunCancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        select! {
            _ = cancellation_token.cancelled() => {
                debug!("cancellation_token canceled.")
            }
            _ = signal::ctrl_c() => {
                warn!("ctrl-c received, stopping after the current request.");
                cancellation_token.cancel();
            }
        }
    })
}
