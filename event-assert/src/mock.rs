//! Ready-made notification sources.
//!
//! [`MockEventSource`] exposes two named events carrying [`NumberArgs`];
//! [`MockPropertySource`] holds two properties and raises a change
//! notification whenever one is set. They are handy for trying the
//! assertions out and for testing code that consumes sources generically.

use std::cell::RefCell;

use crate::{
    Error, EventName, EventSource, Handler, HandlerId, HandlerList, PropertyChangeSource,
    PropertyChanged, Result,
};

pub const USER_EVENT: &str = "user_event";
pub const OTHER_EVENT: &str = "other_event";

pub const FIRST_PROPERTY: &str = "first";
pub const SECOND_PROPERTY: &str = "second";

/// Payload of the [`MockEventSource`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberArgs {
    pub number: i32,
}

/// A source with two events, [`USER_EVENT`] and [`OTHER_EVENT`].
#[derive(Debug, Default)]
pub struct MockEventSource {
    user_event: HandlerList<NumberArgs>,
    other_event: HandlerList<NumberArgs>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger_user_event(&self, number: i32) {
        self.user_event.raise(&NumberArgs { number });
    }

    pub fn trigger_other_event(&self, number: i32) {
        self.other_event.raise(&NumberArgs { number });
    }

    /// Direct access to the handlers of [`USER_EVENT`].
    pub fn user_event_handlers(&self) -> &HandlerList<NumberArgs> {
        &self.user_event
    }

    pub fn user_event_handler_count(&self) -> usize {
        self.user_event.len()
    }

    pub fn other_event_handler_count(&self) -> usize {
        self.other_event.len()
    }

    fn channel(&self, event: &EventName) -> Option<&HandlerList<NumberArgs>> {
        match event.as_str() {
            USER_EVENT => Some(&self.user_event),
            OTHER_EVENT => Some(&self.other_event),
            _ => None,
        }
    }
}

impl EventSource<NumberArgs> for MockEventSource {
    fn subscribe(&self, event: &EventName, handler: Handler<NumberArgs>) -> Result<HandlerId> {
        self.channel(event)
            .map(|channel| channel.add(handler))
            .ok_or_else(|| Error::UnknownEvent(event.clone()))
    }

    fn unsubscribe(&self, event: &EventName, id: HandlerId) -> bool {
        self.channel(event).is_some_and(|channel| channel.remove(id))
    }
}

/// A source with two properties, [`FIRST_PROPERTY`] and [`SECOND_PROPERTY`].
///
/// Setters store the value before notifying, so checks can read the new
/// value back from the source.
#[derive(Debug, Default)]
pub struct MockPropertySource<T> {
    first: RefCell<T>,
    second: RefCell<T>,
    property_changed: HandlerList<PropertyChanged>,
}

impl<T: Clone> MockPropertySource<T> {
    pub fn new(first: T, second: T) -> Self {
        Self {
            first: RefCell::new(first),
            second: RefCell::new(second),
            property_changed: HandlerList::new(),
        }
    }

    pub fn first(&self) -> T {
        self.first.borrow().clone()
    }

    pub fn set_first(&self, value: T) {
        *self.first.borrow_mut() = value;
        self.raise_property_changed(FIRST_PROPERTY);
    }

    pub fn second(&self) -> T {
        self.second.borrow().clone()
    }

    pub fn set_second(&self, value: T) {
        *self.second.borrow_mut() = value;
        self.raise_property_changed(SECOND_PROPERTY);
    }
}

impl<T> MockPropertySource<T> {
    /// Notify that `property` changed without touching any value.
    pub fn raise_property_changed(&self, property: &str) {
        self.property_changed.raise(&PropertyChanged::new(property));
    }

    /// Direct access to the property-change handlers.
    pub fn handlers(&self) -> &HandlerList<PropertyChanged> {
        &self.property_changed
    }

    pub fn handler_count(&self) -> usize {
        self.property_changed.len()
    }
}

impl<T> PropertyChangeSource for MockPropertySource<T> {
    fn subscribe_property_changed(&self, handler: Handler<PropertyChanged>) -> HandlerId {
        self.property_changed.add(handler)
    }

    fn unsubscribe_property_changed(&self, id: HandlerId) -> bool {
        self.property_changed.remove(id)
    }
}
