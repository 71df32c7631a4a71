//! Timeout wrapper for page operations
//!
//! Renderer adapters enforce their own navigation timeout; this wrapper
//! bounds the whole operation as well, so an adapter that ignores its
//! timeout argument cannot stall a batch.

use std::future::Future;
use std::time::Duration;

use crate::renderer::RenderError;

/// Run `operation` for at most `timeout`.
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err(RenderError::Timeout)` - The deadline passed first
/// * `Err(_)` - The operation itself failed
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, url: &str) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            url: url.to_string(),
            timeout,
        }),
    }
}
