use anyhow::Error;
use thiserror::Error;

/// Application-level error types for s3r-rs.
///
/// Every variant except `Cancelled` aborts the run. Individual DeleteObject
/// failures are not represented here: they are logged and counted in the
/// deletion report instead.
///
/// ## Exit Codes
///
/// - 0: Cancelled
/// - 1: RegionLookup, Listing, EmptyTarget, Input
/// - 2: InvalidConfig
#[derive(Error, Debug, PartialEq)]
pub enum S3rError {
    /// GetBucketLocation failed.
    #[error("Failed to resolve bucket region: {0}")]
    RegionLookup(String),

    /// ListObjectVersions failed or returned an unusable page.
    #[error("Failed to list object versions: {0}")]
    Listing(String),

    /// The scan found no versions and no delete markers.
    #[error("This path \"{target}\" is empty!!!")]
    EmptyTarget { target: String },

    /// Reading the confirmation from stdin failed.
    #[error("Failed to read confirmation: {0}")]
    Input(String),

    /// Configuration error.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Interrupted by the user (Ctrl-C).
    #[error("Operation cancelled by user")]
    Cancelled,
}

impl S3rError {
    pub fn exit_code(&self) -> i32 {
        match self {
            S3rError::Cancelled => 0,
            S3rError::InvalidConfig(_) => 2,
            _ => 1,
        }
    }
}

/// Check if an anyhow::Error wraps a cancellation error.
pub fn is_cancelled_error(e: &Error) -> bool {
    if let Some(err) = e.downcast_ref::<S3rError>() {
        return *err == S3rError::Cancelled;
    }
    false
}

/// Check if an anyhow::Error wraps an empty-target error.
pub fn is_empty_target_error(e: &Error) -> bool {
    matches!(
        e.downcast_ref::<S3rError>(),
        Some(S3rError::EmptyTarget { .. })
    )
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    if let Some(err) = e.downcast_ref::<S3rError>() {
        return err.exit_code();
    }
    1
}
