//! Concrete driver variants.
//!
//! - [`kernel::KernelDriver`] — kernel-module lifecycle (modprobe/rmmod)
//! - [`i2c::I2cKernelDriver`] — i2c device-node lifecycle over the bus
//!   control files, plus [`i2c::I2cFanDriver`] adding fan access
//! - [`sysfs`] — drivers over fixed sysfs directories with no kernel
//!   resource of their own

pub mod i2c;
pub mod kernel;
pub mod sysfs;
