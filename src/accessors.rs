//! Capability traits and the logical devices built over them.
//!
//! Drivers expose fine-grained capabilities ([`FanControl`], [`LedControl`])
//! separately from their lifecycle; [`crate::component::Component`]
//! factories wrap those capability handles in thin logical devices
//! ([`Fan`], [`Led`]) that callers hold after bring-up.
//!
//! Capability methods use `anyhow::Result`: a failed sysfs attribute access
//! is reported as-is, there is nothing for the caller to match on.

use std::sync::Arc;

use anyhow::ensure;

/// Fan access over hwmon-style attributes.
///
/// `fan_id` is 1-based, matching the kernel's `pwm<N>`/`fan<N>_input`
/// attribute naming.
pub trait FanControl: Send + Sync {
    /// Largest raw PWM value the hardware accepts.
    fn max_pwm(&self) -> u32;

    /// Set the raw PWM value of a fan.
    fn set_pwm(&self, fan_id: u32, pwm: u32) -> anyhow::Result<()>;

    /// Current raw PWM value of a fan.
    fn pwm(&self, fan_id: u32) -> anyhow::Result<u32>;

    /// Current tachometer reading of a fan.
    fn rpm(&self, fan_id: u32) -> anyhow::Result<u32>;
}

/// LED access over `/sys/class/leds`-style attributes.
pub trait LedControl: Send + Sync {
    /// Set the brightness of a named led.
    fn set_brightness(&self, name: &str, value: u32) -> anyhow::Result<()>;

    /// Current brightness of a named led.
    fn brightness(&self, name: &str) -> anyhow::Result<u32>;
}

/// A logical fan: a fan id bound to a [`FanControl`] driver, optionally
/// with a status [`Led`].
pub struct Fan {
    fan_id: u32,
    driver: Arc<dyn FanControl>,
    led: Option<Led>,
}

impl std::fmt::Debug for Fan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fan")
            .field("fan_id", &self.fan_id)
            .finish_non_exhaustive()
    }
}

impl Fan {
    /// Bind a fan id to a driver.
    pub fn new(fan_id: u32, driver: Arc<dyn FanControl>) -> Self {
        Self {
            fan_id,
            driver,
            led: None,
        }
    }

    /// Attach a status led.
    pub fn with_led(mut self, led: Led) -> Self {
        self.led = Some(led);
        self
    }

    /// The fan's 1-based id.
    pub fn fan_id(&self) -> u32 {
        self.fan_id
    }

    /// Speed as a percentage of the driver's PWM scale.
    pub fn speed(&self) -> anyhow::Result<u32> {
        let max = self.driver.max_pwm();
        ensure!(max > 0, "fan driver reports a zero pwm scale");
        let pwm = self.driver.pwm(self.fan_id)?;
        Ok(pwm * 100 / max)
    }

    /// Set speed as a percentage of the driver's PWM scale.
    pub fn set_speed(&self, percent: u32) -> anyhow::Result<()> {
        let max = self.driver.max_pwm();
        ensure!(max > 0, "fan driver reports a zero pwm scale");
        ensure!(percent <= 100, "fan speed {percent}% out of range");
        self.driver.set_pwm(self.fan_id, percent * max / 100)
    }

    /// Current tachometer reading.
    pub fn rpm(&self) -> anyhow::Result<u32> {
        self.driver.rpm(self.fan_id)
    }

    /// The status led, when one was attached.
    pub fn led(&self) -> Option<&Led> {
        self.led.as_ref()
    }
}

/// A logical led: a name bound to a [`LedControl`] driver.
pub struct Led {
    name: String,
    driver: Arc<dyn LedControl>,
}

impl Led {
    /// Bind a led name to a driver.
    pub fn new(name: impl Into<String>, driver: Arc<dyn LedControl>) -> Self {
        Self {
            name: name.into(),
            driver,
        }
    }

    /// The led's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn the led on.
    pub fn on(&self) -> anyhow::Result<()> {
        self.driver.set_brightness(&self.name, 1)
    }

    /// Turn the led off.
    pub fn off(&self) -> anyhow::Result<()> {
        self.driver.set_brightness(&self.name, 0)
    }

    /// Whether the led is currently lit.
    pub fn is_on(&self) -> anyhow::Result<bool> {
        Ok(self.driver.brightness(&self.name)? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeFan {
        pwm: Mutex<u32>,
    }

    impl FanControl for FakeFan {
        fn max_pwm(&self) -> u32 {
            255
        }

        fn set_pwm(&self, _fan_id: u32, pwm: u32) -> anyhow::Result<()> {
            *self.pwm.lock() = pwm;
            Ok(())
        }

        fn pwm(&self, _fan_id: u32) -> anyhow::Result<u32> {
            Ok(*self.pwm.lock())
        }

        fn rpm(&self, _fan_id: u32) -> anyhow::Result<u32> {
            Ok(4200)
        }
    }

    #[test]
    fn speed_maps_over_pwm_scale() {
        let fan = Fan::new(1, Arc::new(FakeFan::default()));
        fan.set_speed(100).unwrap();
        assert_eq!(fan.speed().unwrap(), 100);
        fan.set_speed(50).unwrap();
        // 127/255 truncates to 49%
        assert_eq!(fan.speed().unwrap(), 49);
    }

    #[test]
    fn speed_over_100_is_rejected() {
        let fan = Fan::new(1, Arc::new(FakeFan::default()));
        assert!(fan.set_speed(101).is_err());
    }

    struct ZeroScaleFan;

    impl FanControl for ZeroScaleFan {
        fn max_pwm(&self) -> u32 {
            0
        }

        fn set_pwm(&self, _fan_id: u32, _pwm: u32) -> anyhow::Result<()> {
            Ok(())
        }

        fn pwm(&self, _fan_id: u32) -> anyhow::Result<u32> {
            Ok(0)
        }

        fn rpm(&self, _fan_id: u32) -> anyhow::Result<u32> {
            Ok(0)
        }
    }

    #[test]
    fn zero_pwm_scale_is_an_error_not_a_panic() {
        let fan = Fan::new(1, Arc::new(ZeroScaleFan));
        assert!(fan.speed().is_err());
        assert!(fan.set_speed(50).is_err());
    }
}
