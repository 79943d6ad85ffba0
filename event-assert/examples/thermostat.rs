use std::cell::Cell;

use event_assert::{
    mock::{FIRST_PROPERTY, MockPropertySource, SECOND_PROPERTY},
    *,
};

#[derive(Debug, Clone, Copy)]
struct Reading {
    celsius: i32,
}

// A device model that reports readings and flips a heating flag.
#[derive(Default)]
struct Thermostat {
    target: i32,
    heating: Cell<bool>,
    readings: HandlerList<Reading>,
    heating_changed: HandlerList<Reading>,
}

impl Thermostat {
    fn new(target: i32) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    fn report(&self, celsius: i32) {
        let reading = Reading { celsius };
        self.readings.raise(&reading);

        let heating = celsius < self.target;
        if heating != self.heating.replace(heating) {
            self.heating_changed.raise(&reading);
        }
    }
}

impl EventSource<Reading> for Thermostat {
    fn subscribe(&self, event: &EventName, handler: Handler<Reading>) -> Result<HandlerId> {
        match event.as_str() {
            "reading" => Ok(self.readings.add(handler)),
            "heating_changed" => Ok(self.heating_changed.add(handler)),
            _ => Err(Error::UnknownEvent(event.clone())),
        }
    }

    fn unsubscribe(&self, event: &EventName, id: HandlerId) -> bool {
        match event.as_str() {
            "reading" => self.readings.remove(id),
            "heating_changed" => self.heating_changed.remove(id),
            _ => false,
        }
    }
}

fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_assert=debug".into()),
        )
        .init();

    let thermostat = Thermostat::new(20);
    let mut readings = EventAssertion::new(&thermostat, "reading")?;
    let mut switches = EventAssertion::new(&thermostat, "heating_changed")?;

    readings.add_callback(
        Callback::new(|r: &Reading| assert!(r.celsius > -50, "sensor out of range"))
            .describe("first reading is plausible"),
    );
    switches.add_callback(
        Callback::new(|r: &Reading| assert!(r.celsius < 20))
            .at(0)
            .describe("heating turns on below target"),
    );
    // Deliberately wrong: the second switch happens at 21.
    switches.add_callback(
        Callback::new(|r: &Reading| {
            if r.celsius == 22 {
                Ok(())
            } else {
                Err(format!("switched off at {}", r.celsius))
            }
        })
        .at(1)
        .describe("heating turns off at 22"),
    );

    for celsius in [18, 19, 21, 22] {
        thermostat.report(celsius);
    }

    println!("readings ok: {}", readings.test_all(4));
    println!("switches ok: {}", switches.test_all(2));
    println!("{}", switches.error_messages());

    // Property changes, counted per property.
    let panel = MockPropertySource::new(0, 0);
    let mut changes = PropertyChangeAssertion::with_config(
        &panel,
        AssertConfig::default().with_label("panel"),
    );

    panel.set_first(1);
    panel.set_second(2);
    panel.set_first(3);

    println!(
        "first changed twice: {}",
        changes.test_property_called(2, FIRST_PROPERTY)
    );
    println!(
        "second changed twice: {}",
        changes.test_property_called(2, SECOND_PROPERTY)
    );
    println!("{}", changes.error_messages());

    #[cfg(feature = "serde")]
    println!("{}", switches.error_log().to_json().unwrap_or_default());

    Ok(())
}
