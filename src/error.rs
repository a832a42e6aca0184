//! Error types for the platform layer.
//!
//! [`PlatformError`] is the typed error for lifecycle operations (setup,
//! clean, bus discovery). Capability traits in [`crate::accessors`] use
//! `anyhow::Result` instead, since sysfs attribute access failures are
//! reported to callers as-is rather than matched on.
//!
//! Propagation policy: setup failures (`Timeout`, `ModuleLoad`, `Io`) are
//! loud and surface to the caller; clean failures are caught and logged by
//! the driver variants themselves. `UnknownDriver` and `MissingCapability`
//! always indicate a board-description wiring bug and are never recovered.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the platform error type.
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Primary error type for platform lifecycle operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A readiness wait exceeded its bound. The enclosing `setup` is
    /// considered failed: the creation call returning does not mean the
    /// kernel finished instantiating the resource.
    #[error("timed out after {timeout:?} waiting for {}", .path.display())]
    Timeout {
        /// Path that never appeared.
        path: PathBuf,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// The module loader failed (spawn error or non-zero exit).
    #[error("failed to load module '{module}': {reason}")]
    ModuleLoad {
        /// Module name as given by the board description (unnormalized).
        module: String,
        /// Loader failure detail.
        reason: String,
    },

    /// A component lookup named a driver kind that was never registered.
    #[error("component '{component}' has no driver of kind '{kind}'")]
    UnknownDriver {
        /// Component display name.
        component: String,
        /// Requested driver kind.
        kind: String,
    },

    /// A registered driver lacks the capability a factory needs.
    #[error("driver '{kind}' in component '{component}' has no {capability} capability")]
    MissingCapability {
        /// Component display name.
        component: String,
        /// Driver kind that was found.
        kind: String,
        /// Capability the factory asked for.
        capability: &'static str,
    },

    /// Enumerating the i2c adapter directory failed. An empty directory is
    /// not an error; only an unreadable one is.
    #[error("failed to enumerate i2c adapters under {}: {source}", .path.display())]
    BusEnumeration {
        /// Adapter root that could not be read.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Sysfs or module-table I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
