//! Component ordering, lookup, and clean-failure isolation.

use std::sync::{Arc, Mutex};

use platform_hal::{
    Component, Driver, DriverHandle, FanControl, LedControl, PlatformError, ReloadCause,
};

type EventLog = Arc<Mutex<Vec<String>>>;

struct RecordingDriver {
    kind: &'static str,
    events: EventLog,
    fail_clean: bool,
}

impl RecordingDriver {
    fn handle(kind: &'static str, events: &EventLog) -> DriverHandle {
        DriverHandle::new(Arc::new(Self {
            kind,
            events: events.clone(),
            fail_clean: false,
        }))
    }

    fn failing_clean(kind: &'static str, events: &EventLog) -> DriverHandle {
        DriverHandle::new(Arc::new(Self {
            kind,
            events: events.clone(),
            fail_clean: true,
        }))
    }

    fn record(&self, action: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{action} {}", self.kind));
    }
}

impl Driver for RecordingDriver {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn setup(&self) -> platform_hal::Result<()> {
        self.record("setup");
        Ok(())
    }

    fn clean(&self) -> platform_hal::Result<()> {
        self.record("clean");
        if self.fail_clean {
            return Err(std::io::Error::other("unload refused").into());
        }
        Ok(())
    }

    fn reload_causes(&self, _clear: bool) -> platform_hal::Result<Vec<ReloadCause>> {
        Ok(vec![ReloadCause {
            name: format!("{}-cause", self.kind),
            time: None,
        }])
    }
}

fn abc_component(events: &EventLog) -> Component {
    Component::named("test")
        .with_driver(RecordingDriver::handle("A", events))
        .with_driver(RecordingDriver::handle("B", events))
        .with_driver(RecordingDriver::handle("C", events))
}

#[test]
fn setup_runs_in_insertion_order() {
    let events: EventLog = Arc::default();
    abc_component(&events).setup().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["setup A", "setup B", "setup C"]
    );
}

#[test]
fn clean_runs_in_reverse_order() {
    let events: EventLog = Arc::default();
    abc_component(&events).clean().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["clean C", "clean B", "clean A"]
    );
}

#[test]
fn one_clean_failure_skips_no_sibling() {
    let events: EventLog = Arc::default();
    let component = Component::named("test")
        .with_driver(RecordingDriver::handle("A", &events))
        .with_driver(RecordingDriver::failing_clean("B", &events))
        .with_driver(RecordingDriver::handle("C", &events));
    component.clean().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["clean C", "clean B", "clean A"]
    );
}

#[test]
fn unknown_driver_lookup_fails_loudly() {
    let events: EventLog = Arc::default();
    let component = abc_component(&events);
    let err = component.driver("Nope").unwrap_err();
    match err {
        PlatformError::UnknownDriver { component, kind } => {
            assert_eq!(component, "test");
            assert_eq!(kind, "Nope");
        }
        other => panic!("expected UnknownDriver, got {other}"),
    }
}

#[test]
fn create_fan_requires_the_fan_capability() {
    let events: EventLog = Arc::default();
    let component = abc_component(&events);
    let err = component.create_fan("A", 1).unwrap_err();
    assert!(matches!(err, PlatformError::MissingCapability { .. }));
}

#[test]
fn reload_causes_aggregate_in_order() {
    let events: EventLog = Arc::default();
    let causes = abc_component(&events).reload_causes(false).unwrap();
    let names: Vec<_> = causes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A-cause", "B-cause", "C-cause"]);
}

#[test]
fn components_nest_as_drivers() {
    let events: EventLog = Arc::default();
    let inner = Component::named("inner").with_driver(RecordingDriver::handle("A", &events));
    let outer = Component::named("outer")
        .with_driver(DriverHandle::new(Arc::new(inner)))
        .with_driver(RecordingDriver::handle("B", &events));

    outer.setup().unwrap();
    outer.clean().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["setup A", "setup B", "clean B", "clean A"]
    );

    let mut dump = String::new();
    outer.dump(&mut dump, 0).unwrap();
    assert_eq!(
        dump,
        " - Component(outer)\n    - Component(inner)\n       - A\n    - B\n"
    );
}

// capability wiring through a single Arc registered for both roles

struct FakeFanCpld {
    pwm: Mutex<u32>,
}

impl Driver for FakeFanCpld {
    fn kind(&self) -> &'static str {
        "FakeFanCpld"
    }
}

impl FanControl for FakeFanCpld {
    fn max_pwm(&self) -> u32 {
        255
    }

    fn set_pwm(&self, _fan_id: u32, pwm: u32) -> anyhow::Result<()> {
        *self.pwm.lock().unwrap() = pwm;
        Ok(())
    }

    fn pwm(&self, _fan_id: u32) -> anyhow::Result<u32> {
        Ok(*self.pwm.lock().unwrap())
    }

    fn rpm(&self, _fan_id: u32) -> anyhow::Result<u32> {
        Ok(4200)
    }
}

struct FakeLeds {
    lit: Mutex<Vec<String>>,
}

impl Driver for FakeLeds {
    fn kind(&self) -> &'static str {
        "FakeLeds"
    }
}

impl LedControl for FakeLeds {
    fn set_brightness(&self, name: &str, value: u32) -> anyhow::Result<()> {
        let mut lit = self.lit.lock().unwrap();
        lit.retain(|n| n != name);
        if value > 0 {
            lit.push(name.to_string());
        }
        Ok(())
    }

    fn brightness(&self, name: &str) -> anyhow::Result<u32> {
        Ok(u32::from(self.lit.lock().unwrap().iter().any(|n| n == name)))
    }
}

#[test]
fn factories_wire_fan_and_led_from_registered_handles() {
    let cpld = Arc::new(FakeFanCpld { pwm: Mutex::new(0) });
    let leds = Arc::new(FakeLeds {
        lit: Mutex::new(Vec::new()),
    });
    let component = Component::named("fan-board")
        .with_driver(DriverHandle::new(cpld.clone()).with_fan(cpld))
        .with_driver(DriverHandle::new(leds.clone()).with_led(leds));

    let fan = component
        .create_fan_with_led("FakeFanCpld", "FakeLeds", 3)
        .unwrap();
    fan.set_speed(100).unwrap();
    assert_eq!(fan.speed().unwrap(), 100);
    assert_eq!(fan.rpm().unwrap(), 4200);

    let led = fan.led().unwrap();
    assert_eq!(led.name(), "fan3");
    led.on().unwrap();
    assert!(led.is_on().unwrap());
    led.off().unwrap();
    assert!(!led.is_on().unwrap());
}
