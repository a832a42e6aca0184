//! Host filesystem roots used by the platform layer.
//!
//! All drivers resolve sysfs and procfs locations through a [`SysfsRoot`]
//! instead of hard-coded absolute paths, so tests can point the whole stack
//! at a temporary directory.

use std::path::{Path, PathBuf};

/// Filesystem roots for sysfs device nodes, i2c adapters, and the kernel
/// module table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsRoot {
    devices: PathBuf,
    adapters: PathBuf,
    modules: PathBuf,
}

impl Default for SysfsRoot {
    fn default() -> Self {
        Self {
            devices: PathBuf::from("/sys/bus/i2c/devices"),
            adapters: PathBuf::from("/sys/class/i2c-adapter"),
            modules: PathBuf::from("/proc/modules"),
        }
    }
}

impl SysfsRoot {
    /// Build a root with explicit locations (used by tests).
    pub fn new(
        devices: impl Into<PathBuf>,
        adapters: impl Into<PathBuf>,
        modules: impl Into<PathBuf>,
    ) -> Self {
        Self {
            devices: devices.into(),
            adapters: adapters.into(),
            modules: modules.into(),
        }
    }

    /// Root of i2c device nodes (`/sys/bus/i2c/devices`).
    pub fn devices_root(&self) -> &Path {
        &self.devices
    }

    /// Root of i2c adapter entries (`/sys/class/i2c-adapter`).
    pub fn adapters_root(&self) -> &Path {
        &self.adapters
    }

    /// Live kernel module table (`/proc/modules`).
    pub fn modules_file(&self) -> &Path {
        &self.modules
    }

    /// The `new_device` control file of a bus adapter.
    pub fn new_device_path(&self, bus: u32) -> PathBuf {
        self.devices.join(format!("i2c-{bus}")).join("new_device")
    }

    /// The `delete_device` control file of a bus adapter.
    pub fn delete_device_path(&self, bus: u32) -> PathBuf {
        self.devices.join(format!("i2c-{bus}")).join("delete_device")
    }
}
