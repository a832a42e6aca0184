//! Hardware platform abstraction layer for network switch appliances.
//!
//! This crate models chassis components (CPLDs, fans, LEDs, I2C-attached
//! peripherals) as composable objects backed by kernel modules and sysfs
//! file paths, and orchestrates their setup/teardown lifecycle: load a
//! kernel module, wait for a readiness file, instantiate an I2C device
//! node, clean everything up on exit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Board Description (out of scope)                │
//! │  Component::named("fan-cpld")                                   │
//! │      .with_driver(DriverHandle::new(fan_driver).with_fan(..))   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Component                              │
//! │  ordered DriverHandle list, keyed by driver kind                │
//! │  setup() forward / clean() reverse / create_fan() factories     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                         Driver trait                            │
//! │  setup | clean | refresh | reset_in | reset_out | dump | causes │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                       Driver variants                           │
//! │  KernelDriver │ I2cKernelDriver │ I2cFanDriver │ *SysfsDriver   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Component` implements [`Driver`] itself, so a board is a tree of
//! driver-shaped composites traversed uniformly.
//!
//! # Error-handling policy
//!
//! Setup failures are loud: a failed modprobe or an expired readiness wait
//! propagates as [`PlatformError`] and the caller decides whether to halt
//! the boot sequence. Clean failures are quiet: teardown is best-effort,
//! each driver's failure is logged and its siblings still run. This
//! asymmetry is intentional.
//!
//! # Simulation mode
//!
//! With [`ExecMode::simulation`] active, every driver variant logs the OS
//! mutation it would perform without executing it, which supports dry runs
//! on machines without the target hardware.

pub mod accessors;
pub mod addr;
pub mod bus;
pub mod component;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod mode;
pub mod modules;
pub mod paths;
pub mod platform;
pub mod wait;

pub use accessors::{Fan, FanControl, Led, LedControl};
pub use addr::I2cAddr;
pub use bus::I2cBusCache;
pub use component::{Component, DriverHandle};
pub use driver::{Driver, ReloadCause};
pub use drivers::i2c::{I2cFanDriver, I2cKernelDriver};
pub use drivers::kernel::KernelDriver;
pub use drivers::sysfs::{FanSysfsDriver, LedSysfsDriver};
pub use error::{PlatformError, Result};
pub use mode::ExecMode;
pub use modules::{CommandRunner, SystemRunner};
pub use paths::SysfsRoot;
pub use platform::Platform;
pub use wait::FileWaiter;
