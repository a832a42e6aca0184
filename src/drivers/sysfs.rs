//! Drivers over fixed sysfs directories.
//!
//! These variants own no kernel resource: another driver's module provides
//! the sysfs tree, and their setup is at most a readiness wait for it.
//! They exist to give components capability access over paths like
//! `/sys/class/leds` or a platform hwmon directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::accessors::{FanControl, LedControl};
use crate::driver::Driver;
use crate::error::Result;
use crate::wait::FileWaiter;

fn read_attr(path: &Path) -> anyhow::Result<u32> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    raw.trim()
        .parse()
        .with_context(|| format!("parsing {} from {}", raw.trim(), path.display()))
}

fn write_attr(path: &Path, value: u32) -> anyhow::Result<()> {
    fs::write(path, value.to_string()).with_context(|| format!("writing {}", path.display()))
}

/// Fan access over `pwm<N>`/`fan<N>_input` files in a fixed hwmon
/// directory.
pub struct FanSysfsDriver {
    sysfs_path: PathBuf,
    max_pwm: u32,
    waiter: FileWaiter,
}

impl FanSysfsDriver {
    /// Driver over the given hwmon directory with the hardware's PWM scale.
    pub fn new(sysfs_path: impl Into<PathBuf>, max_pwm: u32) -> Self {
        Self {
            sysfs_path: sysfs_path.into(),
            max_pwm,
            waiter: FileWaiter::none(),
        }
    }

    /// Wait for the hwmon directory to appear during setup.
    pub fn with_wait(mut self, timeout: Duration) -> Self {
        self.waiter = FileWaiter::new(self.sysfs_path.clone(), timeout);
        self
    }
}

impl Driver for FanSysfsDriver {
    fn kind(&self) -> &'static str {
        "FanSysfsDriver"
    }

    fn describe(&self) -> String {
        format!("FanSysfsDriver({})", self.sysfs_path.display())
    }

    fn setup(&self) -> Result<()> {
        self.waiter.wait_ready()
    }
}

impl FanControl for FanSysfsDriver {
    fn max_pwm(&self) -> u32 {
        self.max_pwm
    }

    fn set_pwm(&self, fan_id: u32, pwm: u32) -> anyhow::Result<()> {
        write_attr(&self.sysfs_path.join(format!("pwm{fan_id}")), pwm)
    }

    fn pwm(&self, fan_id: u32) -> anyhow::Result<u32> {
        read_attr(&self.sysfs_path.join(format!("pwm{fan_id}")))
    }

    fn rpm(&self, fan_id: u32) -> anyhow::Result<u32> {
        read_attr(&self.sysfs_path.join(format!("fan{fan_id}_input")))
    }
}

/// LED access over `<name>/brightness` files in a fixed leds directory.
pub struct LedSysfsDriver {
    sysfs_path: PathBuf,
}

impl LedSysfsDriver {
    /// Driver over the given leds class directory.
    pub fn new(sysfs_path: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_path: sysfs_path.into(),
        }
    }
}

impl Driver for LedSysfsDriver {
    fn kind(&self) -> &'static str {
        "LedSysfsDriver"
    }

    fn describe(&self) -> String {
        format!("LedSysfsDriver({})", self.sysfs_path.display())
    }
}

impl LedControl for LedSysfsDriver {
    fn set_brightness(&self, name: &str, value: u32) -> anyhow::Result<()> {
        write_attr(&self.sysfs_path.join(name).join("brightness"), value)
    }

    fn brightness(&self, name: &str) -> anyhow::Result<u32> {
        read_attr(&self.sysfs_path.join(name).join("brightness"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_attrs_round_trip_through_sysfs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fan1_input"), "4200\n").unwrap();
        let driver = FanSysfsDriver::new(dir.path(), 255);
        driver.set_pwm(1, 128).unwrap();
        assert_eq!(driver.pwm(1).unwrap(), 128);
        assert_eq!(driver.rpm(1).unwrap(), 4200);
    }

    #[test]
    fn setup_waits_for_the_sysfs_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("hwmon1");
        let driver = FanSysfsDriver::new(&missing, 255).with_wait(Duration::from_millis(40));
        assert!(driver.setup().is_err());
        fs::create_dir(&missing).unwrap();
        driver.setup().unwrap();
    }

    #[test]
    fn led_brightness_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("fan1")).unwrap();
        let driver = LedSysfsDriver::new(dir.path());
        driver.set_brightness("fan1", 1).unwrap();
        assert_eq!(driver.brightness("fan1").unwrap(), 1);
    }

    #[test]
    fn missing_attr_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let driver = FanSysfsDriver::new(dir.path(), 255);
        let err = driver.rpm(3).unwrap_err();
        assert!(format!("{err:#}").contains("fan3_input"));
    }
}
