//! I2C bus+address value type.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::SysfsRoot;

/// An immutable I2C bus + device address pair.
///
/// The address is a 7-bit I2C address; construction masks it down. The pair
/// derives the canonical sysfs names the kernel uses for the device node
/// (`<bus>-<4-hex-digit-addr>`) and the adapter (`i2c-<bus>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct I2cAddr {
    bus: u32,
    address: u16,
}

impl I2cAddr {
    /// Create an address pair. Addresses above 0x7f are masked to 7 bits.
    pub fn new(bus: u32, address: u16) -> Self {
        debug_assert!(address <= 0x7f, "i2c addresses are 7-bit");
        Self {
            bus,
            address: address & 0x7f,
        }
    }

    /// Bus id.
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// 7-bit device address.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Kernel device-node name, e.g. `5-0070`.
    pub fn sysfs_name(&self) -> String {
        format!("{}-{:04x}", self.bus, self.address)
    }

    /// Device-node path under the given sysfs root.
    pub fn sysfs_path(&self, root: &SysfsRoot) -> PathBuf {
        root.devices_root().join(self.sysfs_name())
    }

    /// Adapter path (`i2c-<bus>`) under the given sysfs root.
    pub fn bus_sysfs_path(&self, root: &SysfsRoot) -> PathBuf {
        root.devices_root().join(format!("i2c-{}", self.bus))
    }
}

impl fmt::Display for I2cAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus {} addr 0x{:02x}", self.bus, self.address)
    }
}
