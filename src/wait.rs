//! Bounded wait for a filesystem readiness signal.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{PlatformError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls for a path to appear within a bound.
///
/// Driver setup uses this to confirm the kernel actually produced the
/// resource a creation call asked for: the modprobe or `new_device` write
/// returning is not completion. A waiter with no path returns immediately,
/// for drivers whose readiness needs no confirmation.
#[derive(Debug, Clone, Default)]
pub struct FileWaiter {
    path: Option<PathBuf>,
    timeout: Duration,
}

impl FileWaiter {
    /// No wait required.
    pub fn none() -> Self {
        Self::default()
    }

    /// Wait for `path` to exist, up to `timeout`.
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: Some(path.into()),
            timeout,
        }
    }

    /// Block until the path exists or the bound elapses.
    ///
    /// The poll interval is kept strictly below the timeout granularity, so
    /// even short bounds get multiple existence checks.
    pub fn wait_ready(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let deadline = Instant::now() + self.timeout;
        let interval = (self.timeout / 10).clamp(MIN_POLL_INTERVAL, POLL_INTERVAL);
        loop {
            if path.exists() {
                debug!("file {} is ready", path.display());
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PlatformError::Timeout {
                    path: path.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(interval);
        }
    }
}
