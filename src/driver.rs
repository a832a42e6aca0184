//! The driver lifecycle capability set.
//!
//! [`Driver`] is the unit of lifecycle management: the smallest hardware
//! resource binding that can be brought up and torn down. Leaf variants
//! live in [`crate::drivers`]; [`crate::component::Component`] implements
//! the same trait, so a board composes into a uniform driver tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Indentation per level in [`Driver::dump`] output.
pub const DUMP_INDENT: usize = 3;

/// Why the platform last reloaded (power loss, watchdog, reboot request).
///
/// Populated by CPLD-backed drivers that latch cause registers; most
/// drivers report none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadCause {
    /// Cause label, e.g. `powerloss` or `watchdog`.
    pub name: String,
    /// Timestamp of the cause, when the hardware records one.
    pub time: Option<String>,
}

/// Lifecycle capability set shared by leaf drivers and composites.
///
/// # Contract
///
/// - `setup` is idempotent: calling it when the resource already exists is
///   a logged no-op, not an error. Failures are loud and propagate.
/// - `clean` tolerates an already-absent resource, and best-effort
///   failures (an unload that refuses) are caught and logged by the
///   variant itself so that teardown of sibling resources continues.
/// - `refresh`, `reset_in`, `reset_out`, and `reload_causes` default to
///   no-ops; variants override what their hardware supports.
pub trait Driver: Send + Sync {
    /// Registry key of the concrete variant, e.g. `KernelDriver`.
    fn kind(&self) -> &'static str;

    /// One-line display form, `Kind(detail)`.
    fn describe(&self) -> String {
        self.kind().to_string()
    }

    /// Bring the resource up. Safe to re-run.
    fn setup(&self) -> Result<()> {
        Ok(())
    }

    /// Tear the resource down. Safe when already absent.
    fn clean(&self) -> Result<()> {
        Ok(())
    }

    /// Re-read hardware state after an external change.
    fn refresh(&self) -> Result<()> {
        Ok(())
    }

    /// Prepare the resource for an inbound reset.
    fn reset_in(&self) -> Result<()> {
        Ok(())
    }

    /// Release the resource from reset.
    fn reset_out(&self) -> Result<()> {
        Ok(())
    }

    /// Report latched reload causes, optionally clearing them.
    fn reload_causes(&self, _clear: bool) -> Result<Vec<ReloadCause>> {
        Ok(Vec::new())
    }

    /// Write an indented description of this driver (and, for composites,
    /// its children) to `out`.
    fn dump(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        writeln!(
            out,
            "{:indent$} - {}",
            "",
            self.describe(),
            indent = depth * DUMP_INDENT
        )
    }
}
