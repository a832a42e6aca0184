//! Components: ordered driver collections with logical-device factories.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::accessors::{Fan, FanControl, Led, LedControl};
use crate::driver::{Driver, ReloadCause};
use crate::error::{PlatformError, Result};

/// A registered driver plus the capability handles it exposes.
///
/// A driver struct usually implements both [`Driver`] and a capability
/// trait; the board description builds one `Arc` and registers it for
/// both roles:
///
/// ```rust,ignore
/// let fan_cpld = Arc::new(I2cFanDriver::new(&platform, addr, "la_cpld", 255));
/// let handle = DriverHandle::new(fan_cpld.clone()).with_fan(fan_cpld);
/// ```
pub struct DriverHandle {
    driver: Arc<dyn Driver>,
    fan: Option<Arc<dyn FanControl>>,
    led: Option<Arc<dyn LedControl>>,
}

impl std::fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverHandle").finish_non_exhaustive()
    }
}

impl DriverHandle {
    /// Handle over a bare lifecycle driver.
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            fan: None,
            led: None,
        }
    }

    /// Expose fan access through this handle.
    pub fn with_fan(mut self, fan: Arc<dyn FanControl>) -> Self {
        self.fan = Some(fan);
        self
    }

    /// Expose led access through this handle.
    pub fn with_led(mut self, led: Arc<dyn LedControl>) -> Self {
        self.led = Some(led);
        self
    }

    /// The driver's registry key.
    pub fn kind(&self) -> &'static str {
        self.driver.kind()
    }

    /// The lifecycle driver.
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }
}

/// A named, ordered collection of drivers exposed as factories for logical
/// devices.
///
/// Drivers are registered at construction and the list is fixed
/// thereafter. Lookup is by driver kind; a missing kind is a wiring bug in
/// the board description and fails loudly with
/// [`PlatformError::UnknownDriver`].
///
/// Precondition: at most one driver of a given kind per component. A
/// second handle of the same kind is never reached by lookup; this is a
/// board-description constraint, not guarded here.
///
/// `Component` implements [`Driver`] itself: setup delegates to its
/// drivers in insertion order and stops at the first failure, clean
/// delegates in reverse order and never stops, so a board composes into a
/// tree of driver-shaped composites.
#[derive(Default)]
pub struct Component {
    name: Option<String>,
    drivers: Vec<DriverHandle>,
}

impl Component {
    /// Anonymous component.
    pub fn new() -> Self {
        Self::default()
    }

    /// Named component; the name appears in logs, dumps, and errors.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            drivers: Vec::new(),
        }
    }

    /// Register a driver. Order of registration is the setup order.
    pub fn with_driver(mut self, handle: DriverHandle) -> Self {
        self.drivers.push(handle);
        self
    }

    /// The component's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Look up a registered driver by kind.
    pub fn driver(&self, kind: &str) -> Result<&DriverHandle> {
        self.drivers
            .iter()
            .find(|handle| handle.kind() == kind)
            .ok_or_else(|| PlatformError::UnknownDriver {
                component: self.display_name().to_string(),
                kind: kind.to_string(),
            })
    }

    fn capability_error(&self, kind: &str, capability: &'static str) -> PlatformError {
        PlatformError::MissingCapability {
            component: self.display_name().to_string(),
            kind: kind.to_string(),
            capability,
        }
    }

    /// Create a fan handle over the driver of the given kind.
    pub fn create_fan(&self, kind: &str, fan_id: u32) -> Result<Fan> {
        debug!("creating fan {fan_id} on component {}", self.display_name());
        let handle = self.driver(kind)?;
        let fan = handle
            .fan
            .clone()
            .ok_or_else(|| self.capability_error(kind, "fan"))?;
        Ok(Fan::new(fan_id, fan))
    }

    /// Create a fan handle with a status led named `fan<id>` driven by the
    /// led driver of `led_kind`.
    pub fn create_fan_with_led(&self, kind: &str, led_kind: &str, fan_id: u32) -> Result<Fan> {
        let led = self.create_led(led_kind, format!("fan{fan_id}"))?;
        Ok(self.create_fan(kind, fan_id)?.with_led(led))
    }

    /// Create a led handle over the driver of the given kind.
    pub fn create_led(&self, kind: &str, name: impl Into<String>) -> Result<Led> {
        let name = name.into();
        debug!("creating led {name} on component {}", self.display_name());
        let handle = self.driver(kind)?;
        let led = handle
            .led
            .clone()
            .ok_or_else(|| self.capability_error(kind, "led"))?;
        Ok(Led::new(name, led))
    }
}

impl Driver for Component {
    fn kind(&self) -> &'static str {
        "Component"
    }

    fn describe(&self) -> String {
        format!("Component({})", self.display_name())
    }

    fn setup(&self) -> Result<()> {
        for handle in &self.drivers {
            handle.driver.setup()?;
        }
        Ok(())
    }

    fn clean(&self) -> Result<()> {
        // reverse order: later-created resources may depend on earlier
        // ones, and no driver is skipped because a sibling failed
        for handle in self.drivers.iter().rev() {
            if let Err(e) = handle.driver.clean() {
                error!(
                    "cleanup of {} in component {} failed: {e}",
                    handle.driver.describe(),
                    self.display_name()
                );
            }
        }
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        for handle in &self.drivers {
            handle.driver.refresh()?;
        }
        Ok(())
    }

    fn reset_in(&self) -> Result<()> {
        for handle in &self.drivers {
            handle.driver.reset_in()?;
        }
        Ok(())
    }

    fn reset_out(&self) -> Result<()> {
        for handle in &self.drivers {
            handle.driver.reset_out()?;
        }
        Ok(())
    }

    fn reload_causes(&self, clear: bool) -> Result<Vec<ReloadCause>> {
        let mut causes = Vec::new();
        for handle in &self.drivers {
            causes.extend(handle.driver.reload_causes(clear)?);
        }
        Ok(causes)
    }

    fn dump(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        writeln!(
            out,
            "{:indent$} - {}",
            "",
            self.describe(),
            indent = depth * crate::driver::DUMP_INDENT
        )?;
        for handle in &self.drivers {
            handle.driver.dump(out, depth + 1)?;
        }
        Ok(())
    }
}
