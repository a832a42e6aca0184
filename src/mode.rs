//! Execution modes consumed by the driver variants.
//!
//! - **Simulation**: every driver logs the OS mutation it would perform
//!   without executing it, for dry runs on machines without the hardware.
//! - **Debug**: module loads gain diagnostic kernel arguments.
//!
//! Both flags come from the environment and are threaded explicitly through
//! [`crate::platform::Platform`] rather than read from hidden global state.

/// Environment variable enabling simulation mode.
pub const SIMULATION_ENV: &str = "PLATFORM_SIMULATION";

/// Environment variable enabling debug mode.
pub const DEBUG_ENV: &str = "PLATFORM_DEBUG";

/// Execution mode flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecMode {
    /// Log intended OS mutations without performing them.
    pub simulation: bool,
    /// Pass diagnostic flags to module loads.
    pub debug: bool,
}

impl ExecMode {
    /// Read both flags from the environment.
    pub fn from_env() -> Self {
        Self {
            simulation: env_flag(SIMULATION_ENV),
            debug: env_flag(DEBUG_ENV),
        }
    }

    /// Live execution, no debug flags.
    pub fn live() -> Self {
        Self::default()
    }

    /// Simulation mode, no debug flags.
    pub fn simulated() -> Self {
        Self {
            simulation: true,
            debug: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_to_live() {
        std::env::remove_var(SIMULATION_ENV);
        std::env::remove_var(DEBUG_ENV);
        assert_eq!(ExecMode::from_env(), ExecMode::live());
    }

    #[test]
    #[serial]
    fn reads_flags_from_env() {
        std::env::set_var(SIMULATION_ENV, "1");
        std::env::set_var(DEBUG_ENV, "true");
        let mode = ExecMode::from_env();
        assert!(mode.simulation);
        assert!(mode.debug);
        std::env::remove_var(SIMULATION_ENV);
        std::env::remove_var(DEBUG_ENV);
    }

    #[test]
    #[serial]
    fn unset_and_zero_are_off() {
        std::env::set_var(SIMULATION_ENV, "0");
        std::env::remove_var(DEBUG_ENV);
        let mode = ExecMode::from_env();
        assert!(!mode.simulation);
        assert!(!mode.debug);
        std::env::remove_var(SIMULATION_ENV);
    }
}
