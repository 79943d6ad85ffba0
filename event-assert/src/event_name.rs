use crate::name::name_type;

name_type!(
    /// Stable identifier of a named event on a notification source.
    ///
    /// Sources look handlers up by `EventName` in
    /// [`EventSource::subscribe`](crate::EventSource::subscribe). It is cheap
    /// to clone, and equality uses string comparison with a fast path for
    /// shared allocations.
    ///
    /// # Example
    ///
    /// ```rust
    /// use event_assert::EventName;
    ///
    /// let name = EventName::new("user_event");
    /// assert_eq!(name.as_str(), "user_event");
    /// assert_eq!(name, EventName::from("user_event"));
    /// ```
    EventName
);
