/// A cancellation token checked between page fetches and between delete calls.
///
/// This is a type alias for [`tokio_util::sync::CancellationToken`]. The CLI
/// cancels it from its Ctrl-C handler; an in-flight S3 call is never aborted.
pub type RunCancellationToken = tokio_util::sync::CancellationToken;

/// Create a new [`RunCancellationToken`].
///
/// # Example
///
/// ```
/// use s3r_rs::create_run_cancellation_token;
///
/// let token = create_run_cancellation_token();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
pub fn create_run_cancellation_token() -> RunCancellationToken {
    tokio_util::sync::CancellationToken::new()
}
