//! Browser shutdown after a crawl.

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    Success,
    /// Some steps failed; each entry describes one failure.
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process, and remove its profile directory.
///
/// Every step runs even if an earlier one failed.
pub async fn cleanup_browser_and_data(mut browser: Browser, user_data_dir: &Path) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "sitescout::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "sitescout::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    if let Err(e) = browser.wait().await {
        warn!(target: "sitescout::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    if let Err(e) = std::fs::remove_dir_all(user_data_dir) {
        warn!(target: "sitescout::cleanup", "Failed to remove {}: {e}", user_data_dir.display());
        errors.push(format!("Profile cleanup failed: {e}"));
    }

    if errors.is_empty() {
        debug!(target: "sitescout::cleanup", "Browser shut down cleanly");
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}
