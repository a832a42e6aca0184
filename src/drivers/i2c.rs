//! I2C device-node backed drivers.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::accessors::FanControl;
use crate::addr::I2cAddr;
use crate::driver::Driver;
use crate::error::Result;
use crate::platform::Platform;
use crate::wait::FileWaiter;

/// Driver whose resource is an i2c device node, instantiated by writing to
/// the bus adapter's `new_device` control file.
///
/// Setup and clean are existence-checked and idempotent: the node may have
/// been created by an earlier run, or removed already by a module unload.
/// `setup(); clean(); setup()` converges to the present state.
pub struct I2cKernelDriver {
    addr: I2cAddr,
    name: String,
    waiter: FileWaiter,
    platform: Platform,
}

impl I2cKernelDriver {
    /// Driver instantiating `name` at `addr`, no readiness wait.
    pub fn new(platform: &Platform, addr: I2cAddr, name: impl Into<String>) -> Self {
        Self {
            addr,
            name: name.into(),
            waiter: FileWaiter::none(),
            platform: platform.clone(),
        }
    }

    /// Wait for `path` to appear after instantiation, up to `timeout`.
    pub fn with_wait(mut self, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        self.waiter = FileWaiter::new(path, timeout);
        self
    }

    /// The device's address.
    pub fn addr(&self) -> I2cAddr {
        self.addr
    }

    /// Device-node path, e.g. `<devices-root>/5-0070`.
    pub fn sysfs_path(&self) -> PathBuf {
        self.addr.sysfs_path(&self.platform.root)
    }

    /// Adapter path, e.g. `<devices-root>/i2c-5`.
    pub fn bus_sysfs_path(&self) -> PathBuf {
        self.addr.bus_sysfs_path(&self.platform.root)
    }

    /// Whether the device node currently exists.
    pub fn present(&self) -> bool {
        self.sysfs_path().exists()
    }
}

impl Driver for I2cKernelDriver {
    fn kind(&self) -> &'static str {
        "I2cKernelDriver"
    }

    fn describe(&self) -> String {
        format!("I2cKernelDriver({})", self.name)
    }

    fn setup(&self) -> Result<()> {
        debug!(
            "creating i2c device {} on bus {} at 0x{:02x}",
            self.name,
            self.addr.bus(),
            self.addr.address()
        );
        let control = self.platform.root.new_device_path(self.addr.bus());
        let payload = format!("{} 0x{:02x}", self.name, self.addr.address());
        if self.platform.mode.simulation {
            debug!("simulation: would write '{payload}' to {}", control.display());
            return Ok(());
        }
        let device_path = self.sysfs_path();
        if device_path.exists() {
            debug!("i2c device {} already exists", device_path.display());
            return Ok(());
        }
        fs::write(&control, payload)?;
        // the write returning does not mean the node exists yet
        self.waiter.wait_ready()
    }

    fn clean(&self) -> Result<()> {
        // device nodes are also reclaimed when their module unloads; the
        // manual delete keeps teardown deterministic regardless of order
        if self.platform.mode.simulation {
            return Ok(());
        }
        if self.present() {
            debug!(
                "removing i2c device {} from bus {}",
                self.name,
                self.addr.bus()
            );
            let control = self.platform.root.delete_device_path(self.addr.bus());
            fs::write(control, format!("0x{:02x}", self.addr.address()))?;
        }
        Ok(())
    }
}

/// An [`I2cKernelDriver`] whose instantiated device exposes hwmon-style fan
/// attributes (`pwm<N>`, `fan<N>_input`) under its device node.
pub struct I2cFanDriver {
    inner: I2cKernelDriver,
    max_pwm: u32,
}

impl I2cFanDriver {
    /// Fan driver for `name` at `addr` with the hardware's PWM scale.
    pub fn new(platform: &Platform, addr: I2cAddr, name: impl Into<String>, max_pwm: u32) -> Self {
        Self {
            inner: I2cKernelDriver::new(platform, addr, name),
            max_pwm,
        }
    }

    /// Wait for `path` to appear after instantiation, up to `timeout`.
    pub fn with_wait(mut self, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        self.inner = self.inner.with_wait(path, timeout);
        self
    }

    fn attr_path(&self, attr: &str) -> PathBuf {
        self.inner.sysfs_path().join(attr)
    }

    fn read_attr(&self, attr: &str) -> anyhow::Result<u32> {
        let path = self.attr_path(attr);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("parsing {} from {}", raw.trim(), path.display()))
    }

    fn write_attr(&self, attr: &str, value: u32) -> anyhow::Result<()> {
        let path = self.attr_path(attr);
        fs::write(&path, value.to_string()).with_context(|| format!("writing {}", path.display()))
    }
}

impl Driver for I2cFanDriver {
    fn kind(&self) -> &'static str {
        "I2cFanDriver"
    }

    fn describe(&self) -> String {
        format!("I2cFanDriver({})", self.inner.name)
    }

    fn setup(&self) -> Result<()> {
        self.inner.setup()
    }

    fn clean(&self) -> Result<()> {
        self.inner.clean()
    }
}

impl FanControl for I2cFanDriver {
    fn max_pwm(&self) -> u32 {
        self.max_pwm
    }

    fn set_pwm(&self, fan_id: u32, pwm: u32) -> anyhow::Result<()> {
        self.write_attr(&format!("pwm{fan_id}"), pwm)
    }

    fn pwm(&self, fan_id: u32) -> anyhow::Result<u32> {
        self.read_attr(&format!("pwm{fan_id}"))
    }

    fn rpm(&self, fan_id: u32) -> anyhow::Result<u32> {
        self.read_attr(&format!("fan{fan_id}_input"))
    }
}
