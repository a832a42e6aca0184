//! Bring-up context shared by driver constructors.

use std::fmt;
use std::sync::Arc;

use crate::bus::I2cBusCache;
use crate::mode::ExecMode;
use crate::modules::{CommandRunner, SystemRunner};
use crate::paths::SysfsRoot;

/// Everything a driver needs from its host: filesystem roots, execution
/// mode, the subprocess runner, and the shared bus cache.
///
/// There is no hidden global state; the board description builds one
/// `Platform` and threads clones of it through every driver constructor.
#[derive(Clone)]
pub struct Platform {
    /// Sysfs and procfs roots.
    pub root: SysfsRoot,
    /// Simulation/debug flags.
    pub mode: ExecMode,
    /// Subprocess seam for module loads.
    pub runner: Arc<dyn CommandRunner>,
    /// Shared i2c bus-name cache.
    pub buses: Arc<I2cBusCache>,
}

impl Platform {
    /// Platform over the real host filesystem, with modes read from the
    /// environment.
    pub fn host() -> Self {
        Self::with_root(SysfsRoot::default()).with_mode(ExecMode::from_env())
    }

    /// Platform over an explicit sysfs layout (used by tests), live mode.
    pub fn with_root(root: SysfsRoot) -> Self {
        Self {
            buses: Arc::new(I2cBusCache::new(&root)),
            root,
            mode: ExecMode::live(),
            runner: Arc::new(SystemRunner),
        }
    }

    /// Replace the execution mode.
    pub fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the subprocess runner.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("root", &self.root)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
