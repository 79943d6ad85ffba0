use crate::{EventName, Handler, HandlerId, PropertyName, Result};

/// A target object that exposes named events carrying payloads of type `A`.
///
/// Implement this on the object under test (or on a thin wrapper around it).
/// The usual implementation keeps one [`HandlerList`](crate::HandlerList) per
/// event and forwards to it, returning [`Error::UnknownEvent`] for names the
/// object does not expose. A source with events of different payload types
/// implements the trait once per payload type.
///
/// # Example
///
/// ```rust
/// use event_assert::{Error, EventName, EventSource, Handler, HandlerId, HandlerList, Result};
///
/// #[derive(Default)]
/// struct Button {
///     clicked: HandlerList<u32>,
/// }
///
/// impl EventSource<u32> for Button {
///     fn subscribe(&self, event: &EventName, handler: Handler<u32>) -> Result<HandlerId> {
///         match event.as_str() {
///             "clicked" => Ok(self.clicked.add(handler)),
///             _ => Err(Error::UnknownEvent(event.clone())),
///         }
///     }
///
///     fn unsubscribe(&self, event: &EventName, id: HandlerId) -> bool {
///         event.as_str() == "clicked" && self.clicked.remove(id)
///     }
/// }
/// ```
///
/// [`Error::UnknownEvent`]: crate::Error::UnknownEvent
pub trait EventSource<A> {
    /// Attach `handler` to the named event.
    fn subscribe(&self, event: &EventName, handler: Handler<A>) -> Result<HandlerId>;

    /// Detach a handler previously returned by [`subscribe`](Self::subscribe).
    ///
    /// Returns `false` if the handler was not attached.
    fn unsubscribe(&self, event: &EventName, id: HandlerId) -> bool;
}

/// Payload of a property-change notification: the name of the property that
/// changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyChanged {
    property: PropertyName,
}

impl PropertyChanged {
    pub fn new(property: impl Into<PropertyName>) -> Self {
        Self {
            property: property.into(),
        }
    }

    /// Returns the name of the property that changed.
    pub fn property(&self) -> &PropertyName {
        &self.property
    }
}

/// A target object that raises one composite notification whenever any of
/// its properties changes.
///
/// Unlike [`EventSource`], there is a single channel, so subscribing cannot
/// fail.
pub trait PropertyChangeSource {
    fn subscribe_property_changed(&self, handler: Handler<PropertyChanged>) -> HandlerId;

    /// Returns `false` if the handler was not attached.
    fn unsubscribe_property_changed(&self, id: HandlerId) -> bool;
}
