//! Kernel-module backed driver.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error};

use crate::driver::Driver;
use crate::error::Result;
use crate::modules::{is_module_loaded, modprobe, rmmod};
use crate::platform::Platform;
use crate::wait::FileWaiter;

/// Driver whose resource is a loaded kernel module.
///
/// Setup loads the module and optionally waits for a file the module is
/// expected to create; clean unloads it best-effort. Loaded state is never
/// cached, it is read from the live module table on every query.
pub struct KernelDriver {
    module: String,
    args: Vec<String>,
    waiter: FileWaiter,
    platform: Platform,
}

impl KernelDriver {
    /// Driver for the given module, no extra args, no readiness wait.
    pub fn new(platform: &Platform, module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            args: Vec::new(),
            waiter: FileWaiter::none(),
            platform: platform.clone(),
        }
    }

    /// Pass extra arguments to the module load.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Wait for `path` to appear after the load, up to `timeout`.
    pub fn with_wait(mut self, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        self.waiter = FileWaiter::new(path, timeout);
        self
    }

    /// Live query of the module table.
    pub fn loaded(&self) -> Result<bool> {
        is_module_loaded(&self.module, &self.platform.root)
    }
}

impl Driver for KernelDriver {
    fn kind(&self) -> &'static str {
        "KernelDriver"
    }

    fn describe(&self) -> String {
        format!("KernelDriver({})", self.module)
    }

    fn setup(&self) -> Result<()> {
        modprobe(
            &self.module,
            &self.args,
            self.platform.mode,
            self.platform.runner.as_ref(),
        )?;
        self.waiter.wait_ready()
    }

    fn clean(&self) -> Result<()> {
        match self.loaded() {
            Ok(true) => {
                if let Err(e) = rmmod(
                    &self.module,
                    self.platform.mode,
                    self.platform.runner.as_ref(),
                ) {
                    error!("failed to unload {}: {e}", self.module);
                }
            }
            Ok(false) => debug!("module {} is not loaded", self.module),
            Err(e) => error!("could not read module table for {}: {e}", self.module),
        }
        Ok(())
    }
}
