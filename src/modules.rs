//! Kernel module table operations.
//!
//! Module names interchange `-` and `_`: the board description may say
//! `rook-fan-cpld` while the kernel knows `rook_fan_cpld`. Every operation
//! here normalizes before touching the loader or the module table.
//!
//! Loader invocations go through the [`CommandRunner`] seam so tests can
//! record the exact argv instead of spawning processes.

use std::fs;
use std::process::Command;

use anyhow::Context;
use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::mode::ExecMode;
use crate::paths::SysfsRoot;

/// Diagnostic argument appended to module loads in debug mode.
const DEBUG_MODULE_ARGS: &str = "dyndbg=+pf";

/// Seam for subprocess invocation.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, failing on spawn error or non-zero exit.
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<()>;
}

/// Real runner backed by [`std::process::Command`] (blocking).
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to spawn {program}"))?;
        anyhow::ensure!(status.success(), "{program} exited with {status}");
        Ok(())
    }
}

/// Replace `-` with `_`, the form the kernel uses.
pub fn normalize_module_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Load a kernel module via modprobe, normalizing the name and appending
/// diagnostic flags in debug mode. Loader failures propagate.
pub fn modprobe(
    module: &str,
    extra_args: &[String],
    mode: ExecMode,
    runner: &dyn CommandRunner,
) -> Result<()> {
    debug!("loading module {module}");
    let mut args = vec![normalize_module_name(module)];
    args.extend_from_slice(extra_args);
    if mode.debug {
        args.push(DEBUG_MODULE_ARGS.to_string());
    }
    run_modprobe(module, args, mode, runner)
}

/// Unload a kernel module via `modprobe -r`. Failures propagate; callers
/// performing best-effort teardown catch and log them.
pub fn rmmod(module: &str, mode: ExecMode, runner: &dyn CommandRunner) -> Result<()> {
    debug!("unloading module {module}");
    let args = vec!["-r".to_string(), normalize_module_name(module)];
    run_modprobe(module, args, mode, runner)
}

fn run_modprobe(
    module: &str,
    args: Vec<String>,
    mode: ExecMode,
    runner: &dyn CommandRunner,
) -> Result<()> {
    if mode.simulation {
        debug!("exec: modprobe {}", args.join(" "));
        return Ok(());
    }
    runner
        .run("modprobe", &args)
        .map_err(|e| PlatformError::ModuleLoad {
            module: module.to_string(),
            reason: format!("{e:#}"),
        })
}

/// Whether a module is currently loaded, read live from the module table.
///
/// Never cached: the table is OS-global mutable state and drivers must see
/// the current view.
pub fn is_module_loaded(module: &str, root: &SysfsRoot) -> Result<bool> {
    let table = fs::read_to_string(root.modules_file())?;
    let needle = format!("{} ", normalize_module_name(module));
    Ok(table.lines().any(|line| line.starts_with(&needle)))
}
