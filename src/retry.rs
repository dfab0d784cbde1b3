/*!
 * Fixed-delay retry around file reads
 */

use std::io;
use std::path::Path;
use std::time::Duration;

use log::warn;

use crate::fs::FileSystem;
use crate::types::{DEFAULT_READ_RETRIES, DEFAULT_RETRY_DELAY};

/// How often and how patiently a failed read is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_READ_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Outcome of a read that eventually succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// File text
    pub text: String,
    /// Number of failed attempts before the successful one
    pub retries: u32,
}

/// Read the file at `path`, retrying every failure after a fixed delay
///
/// The delay suspends the task on the runtime timer, so sibling reads keep
/// running. Once `policy.retries` retries have failed the last error is
/// returned.
pub async fn read_with_retry<F>(fs: &F, path: &Path, policy: RetryPolicy) -> io::Result<ReadOutcome>
where
    F: FileSystem + ?Sized,
{
    let mut remaining = policy.retries;

    loop {
        match fs.read_text(path).await {
            Ok(text) => {
                return Ok(ReadOutcome {
                    text,
                    retries: policy.retries - remaining,
                })
            }
            Err(e) if remaining > 0 => {
                warn!(
                    "Failed to read {} ({}), retrying in {:?} ({} left)",
                    path.display(),
                    e,
                    policy.delay,
                    remaining
                );
                remaining -= 1;
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
