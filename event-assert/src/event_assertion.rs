use std::fmt;

use crate::{
    AssertConfig, Callback, ErrorLog, EventName, EventSource, ResetPolicy, Result, Unpartitioned,
    observer::Observer, subscription::Subscription,
};

/// Assertions over one named event of a source.
///
/// Construction attaches a handler to the event; from then on every raise
/// is counted and drives the callbacks registered with
/// [`add_callback`](Self::add_callback). Assertions return `bool` and record
/// every failure in the [`ErrorLog`], so the test decides how to report.
///
/// The handler is detached by [`dispose`](Self::dispose) or when the
/// assertion is dropped. The borrow of the source guarantees the source
/// outlives the assertion.
///
/// # Example
///
/// ```rust,ignore
/// let source = Thermostat::default();
/// let mut readings = EventAssertion::new(&source, "reading")?;
///
/// readings.add_callback(
///     Callback::new(|r: &Reading| assert_eq!(r.celsius, 21))
///         .at(1)
///         .describe("second reading is 21"),
/// );
///
/// source.report(19);
/// source.report(21);
///
/// assert!(readings.test_all(2), "{}", readings.error_messages());
/// ```
pub struct EventAssertion<'s, A> {
    event: EventName,
    observer: Observer<A, Unpartitioned>,
    subscription: Subscription<'s>,
}

impl<'s, A: 'static> EventAssertion<'s, A> {
    /// Observe `event` on `source` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`](crate::Error::UnknownEvent) if the
    /// source does not expose `event`.
    pub fn new<S>(source: &'s S, event: impl Into<EventName>) -> Result<Self>
    where
        S: EventSource<A> + ?Sized,
    {
        Self::with_config(source, event, AssertConfig::default())
    }

    /// Observe `event` on `source` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`](crate::Error::UnknownEvent) if the
    /// source does not expose `event`.
    pub fn with_config<S>(
        source: &'s S,
        event: impl Into<EventName>,
        config: AssertConfig,
    ) -> Result<Self>
    where
        S: EventSource<A> + ?Sized,
    {
        let event = event.into();
        let observer = Observer::new(
            config.label().unwrap_or(event.as_str()),
            config.reset_policy(),
        );
        let id = source.subscribe(&event, observer.handler())?;
        tracing::debug!(event = %event, handler_id = id, "event assertion subscribed");

        let name = event.clone();
        let subscription = Subscription::new(id, move |id| source.unsubscribe(&name, id));
        Ok(Self {
            event,
            observer,
            subscription,
        })
    }

    /// Returns the observed event.
    pub fn event(&self) -> &EventName {
        &self.event
    }

    /// Register a callback and return the position it will run at.
    pub fn add_callback(&mut self, callback: Callback<A>) -> usize {
        self.observer.add_callback(None, callback)
    }

    /// Returns the number of raises observed since construction or the
    /// last consuming assertion.
    pub fn times_called(&self) -> usize {
        self.observer.times_called(None)
    }

    /// Returns `true` if the event was raised exactly `expected` times.
    pub fn test_times_called(&mut self, expected: usize) -> bool {
        self.observer.test_times_called(None, expected)
    }

    /// Returns `true` if every callback ran and none of their checks failed.
    ///
    /// Logs one entry for each callback that never ran. With no callbacks
    /// registered this is always `true`.
    pub fn test_all_callbacks_invoked(&mut self) -> bool {
        self.observer.test_callbacks_invoked(None)
    }

    /// Both [`test_times_called`](Self::test_times_called) and
    /// [`test_all_callbacks_invoked`](Self::test_all_callbacks_invoked).
    ///
    /// Both halves always run, so every failure is logged.
    pub fn test_all(&mut self, expected: usize) -> bool {
        let count = self.test_times_called(expected);
        let callbacks = self.test_all_callbacks_invoked();
        count && callbacks
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.observer.reset_policy()
    }

    /// Change the reset policy for subsequent assertions.
    pub fn set_reset_policy(&mut self, policy: ResetPolicy) {
        self.observer.set_reset_policy(policy);
    }

    /// Every recorded failure, one per line.
    pub fn error_messages(&self) -> String {
        self.observer.error_messages()
    }

    /// A snapshot of the error log.
    pub fn error_log(&self) -> ErrorLog {
        self.observer.error_log()
    }

    pub fn error_count(&self) -> usize {
        self.observer.error_count()
    }

    pub fn clear_errors(&mut self) {
        self.observer.clear_errors();
    }

    /// Detach from the source. Later raises are no longer observed.
    ///
    /// Calling this more than once has no further effect. Counters, callbacks
    /// and the error log stay readable.
    pub fn dispose(&mut self) {
        if self.subscription.dispose() {
            tracing::debug!(event = %self.event, "event assertion disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        !self.subscription.is_active()
    }
}

impl<A> fmt::Debug for EventAssertion<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventAssertion")
            .field("event", &self.event)
            .field("handler_id", &self.subscription.id())
            .field("observer", &self.observer)
            .field("disposed", &!self.subscription.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        Error, FailureKind,
        mock::{MockEventSource, NumberArgs, OTHER_EVENT, USER_EVENT},
    };

    fn user_event(source: &MockEventSource) -> EventAssertion<'_, NumberArgs> {
        EventAssertion::new(source, USER_EVENT).expect("mock exposes the user event")
    }

    // ==================== Number of calls ====================

    #[test]
    fn counts_raises() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(test.test_times_called(2), "{}", test.error_messages());
        assert_eq!(test.error_count(), 0);
    }

    #[test]
    fn fewer_raises_than_expected_fails() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        source.trigger_user_event(10);

        assert!(!test.test_times_called(2));
        assert_eq!(test.error_messages(), "user_event: expected 2 call(s), observed 1");
    }

    #[test]
    fn more_raises_than_expected_fails() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        for n in [10, 20, 30] {
            source.trigger_user_event(n);
        }

        assert!(!test.test_times_called(2));
        assert_eq!(test.error_log().count_of(FailureKind::CountMismatch), 1);
    }

    #[test]
    fn only_matching_count_passes() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        for n in 0..3 {
            source.trigger_user_event(n);
        }

        assert!(!test.test_times_called(2));
        assert!(test.test_times_called(3));
        assert!(!test.test_times_called(4));
        assert_eq!(test.error_count(), 2);
    }

    #[test]
    fn other_events_are_not_counted() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        source.trigger_other_event(1);

        assert!(test.test_times_called(0));
    }

    #[test]
    fn unknown_event_is_rejected() {
        let source = MockEventSource::new();

        let result = EventAssertion::<NumberArgs>::new(&source, "missing");

        assert_eq!(result.err(), Some(Error::UnknownEvent(EventName::new("missing"))));
        assert_eq!(source.user_event_handler_count(), 0);
    }

    // ==================== Callbacks ====================

    #[test]
    fn callbacks_run_at_their_positions() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(
            Callback::new(|e: &NumberArgs| assert!(e.number >= 0)).describe("numbers are positive"),
        );
        test.add_callback(
            Callback::new(|e: &NumberArgs| assert_eq!(e.number, 30))
                .at(2)
                .describe("third call carries 30"),
        );

        for n in [10, 20, 30] {
            source.trigger_user_event(n);
        }

        assert!(test.test_all_callbacks_invoked(), "{}", test.error_messages());
    }

    #[test]
    fn callback_runs_exactly_once_on_its_raise() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);
        let seen = Rc::new(Cell::new(None));
        let runs = Rc::new(Cell::new(0));

        let (s, r) = (seen.clone(), runs.clone());
        test.add_callback(
            Callback::new(move |e: &NumberArgs| {
                s.set(Some(e.number));
                r.set(r.get() + 1);
            })
            .at(1),
        );

        for n in [10, 20, 30, 40] {
            source.trigger_user_event(n);
        }

        assert_eq!(seen.get(), Some(20));
        assert_eq!(runs.get(), 1);
        assert!(test.test_all_callbacks_invoked());
    }

    #[test]
    fn unreached_position_fails_with_description() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(
            Callback::new(|_: &NumberArgs| {})
                .at(2)
                .describe("This description names the callback that never ran."),
        );

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(!test.test_all_callbacks_invoked());
        let log = test.error_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].kind(), FailureKind::NotInvoked);
        assert_eq!(
            log.entries()[0].description(),
            "This description names the callback that never ran."
        );
    }

    #[test]
    fn callback_without_raise_fails() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(Callback::new(|_: &NumberArgs| {}));

        assert!(!test.test_all_callbacks_invoked());
        assert_eq!(
            test.error_messages(),
            "callback at call #1: not invoked: expected at call #1, observed 0 call(s)"
        );
    }

    #[test]
    fn no_callbacks_is_vacuously_invoked() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);
        assert!(test.test_all_callbacks_invoked());
    }

    #[test]
    fn failing_check_is_logged_and_count_is_unaffected() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(
            Callback::new(|e: &NumberArgs| assert_eq!(e.number, 99, "third number"))
                .at(2)
                .describe("third call carries 99"),
        );

        // The failing check must not reach the raiser.
        for n in [1, 2, 3] {
            source.trigger_user_event(n);
        }

        assert!(!test.test_all_callbacks_invoked());
        let log = test.error_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].kind(), FailureKind::CheckFailed);
        assert_eq!(log.entries()[0].description(), "third call carries 99");
        assert!(log.entries()[0].detail().contains("third number"));

        assert!(test.test_times_called(3));
        assert_eq!(test.error_count(), 1);
    }

    #[test]
    fn fallible_check_reports_its_error() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(
            Callback::new(|e: &NumberArgs| {
                if e.number % 2 == 0 {
                    Ok(())
                } else {
                    Err(format!("{} is odd", e.number))
                }
            })
            .describe("even numbers only"),
        );

        source.trigger_user_event(7);

        assert!(!test.test_all_callbacks_invoked());
        assert_eq!(test.error_messages(), "even numbers only: 7 is odd");
    }

    // ==================== All ====================

    #[test]
    fn test_all_passes() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(
            Callback::new(|e: &NumberArgs| assert_eq!(e.number, 20))
                .at(1)
                .describe("second call carries 20"),
        );

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(test.test_all(2), "{}", test.error_messages());
    }

    #[test]
    fn test_all_fails_on_callback() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(Callback::new(|_: &NumberArgs| {}).at(2));

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(!test.test_all(2));
        assert_eq!(test.error_log().count_of(FailureKind::NotInvoked), 1);
        assert_eq!(test.error_count(), 1);
    }

    #[test]
    fn test_all_fails_on_count() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(Callback::new(|e: &NumberArgs| assert_eq!(e.number, 20)).at(1));

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(!test.test_all(3));
        assert_eq!(test.error_log().count_of(FailureKind::CountMismatch), 1);
        assert_eq!(test.error_count(), 1);
    }

    #[test]
    fn test_all_records_both_failures() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        test.add_callback(Callback::new(|_: &NumberArgs| {}).at(3));

        source.trigger_user_event(10);
        source.trigger_user_event(20);

        assert!(!test.test_all(3));
        assert_eq!(test.error_count(), 2);
    }

    // ==================== Reset ====================

    #[test]
    fn reset_on_assert_consumes_count() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);
        test.set_reset_policy(ResetPolicy::ResetOnAssert);

        source.trigger_user_event(10);

        assert!(test.test_times_called(1));
        assert!(test.test_times_called(0));

        test.set_reset_policy(ResetPolicy::Keep);
        source.trigger_user_event(10);

        assert!(test.test_times_called(1));
        assert!(test.test_times_called(1));
    }

    #[test]
    fn reset_on_assert_second_read_fails() {
        let source = MockEventSource::new();
        let config = AssertConfig::default().with_reset_on_assert(true);
        let mut test =
            EventAssertion::<NumberArgs>::with_config(&source, USER_EVENT, config).unwrap();

        source.trigger_user_event(1);

        assert!(test.test_times_called(1));
        assert!(!test.test_times_called(1));
    }

    #[test]
    fn count_reset_restarts_firing_index() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);
        test.set_reset_policy(ResetPolicy::ResetOnAssert);
        let seen = Rc::new(Cell::new(None));

        let s = seen.clone();
        test.add_callback(Callback::new(move |e: &NumberArgs| s.set(Some(e.number))).at(1));

        source.trigger_user_event(10);
        assert!(test.test_times_called(1));

        source.trigger_user_event(20);
        assert_eq!(seen.get(), None);
        assert_eq!(test.times_called(), 1);

        source.trigger_user_event(30);
        assert_eq!(seen.get(), Some(30));
        assert!(test.test_all_callbacks_invoked());
    }

    #[test]
    fn reset_on_assert_consumes_callbacks() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);
        test.add_callback(Callback::new(|_: &NumberArgs| {}));
        test.set_reset_policy(ResetPolicy::ResetOnAssert);

        source.trigger_user_event(10);

        assert!(test.test_all_callbacks_invoked());
        assert!(!test.test_all_callbacks_invoked());

        test.clear_errors();
        test.set_reset_policy(ResetPolicy::Keep);
        source.trigger_user_event(10);

        assert!(test.test_all_callbacks_invoked());
        assert!(test.test_all_callbacks_invoked());
        assert_eq!(test.error_count(), 0);
    }

    // ==================== Dispose ====================

    #[test]
    fn drop_detaches_handler() {
        let source = MockEventSource::new();
        source.user_event_handlers().add(Rc::new(|_: &NumberArgs| {}));
        {
            let mut test = user_event(&source);
            assert_eq!(source.user_event_handler_count(), 2);
            source.trigger_user_event(10);
            assert!(test.test_all(1));
        }
        assert_eq!(source.user_event_handler_count(), 1);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_observation() {
        let source = MockEventSource::new();
        let mut test = user_event(&source);

        source.trigger_user_event(1);
        test.dispose();
        test.dispose();
        source.trigger_user_event(2);

        assert!(test.is_disposed());
        assert_eq!(source.user_event_handler_count(), 0);
        assert!(test.test_times_called(1));
        drop(test);
        assert_eq!(source.user_event_handler_count(), 0);
    }

    // ==================== Scoping ====================

    #[test]
    fn auto_positions_are_per_assertion() {
        let source = MockEventSource::new();
        let mut first = user_event(&source);
        let mut second = user_event(&source);

        assert_eq!(first.add_callback(Callback::new(|_: &NumberArgs| {})), 0);
        assert_eq!(first.add_callback(Callback::new(|_: &NumberArgs| {})), 1);
        assert_eq!(second.add_callback(Callback::new(|_: &NumberArgs| {})), 0);

        source.trigger_user_event(1);

        assert!(second.test_all_callbacks_invoked());
        assert!(!first.test_all_callbacks_invoked());
    }

    #[test]
    fn label_names_count_mismatches() {
        let source = MockEventSource::new();
        let config = AssertConfig::default().with_label("mock.user");
        let mut test =
            EventAssertion::<NumberArgs>::with_config(&source, USER_EVENT, config).unwrap();

        assert!(!test.test_times_called(1));
        assert_eq!(test.error_messages(), "mock.user: expected 1 call(s), observed 0");
        assert_eq!(test.event().as_str(), USER_EVENT);
    }

    #[test]
    fn other_event_can_be_observed_separately() {
        let source = MockEventSource::new();
        let mut user = user_event(&source);
        let mut other = EventAssertion::<NumberArgs>::new(&source, OTHER_EVENT).unwrap();

        source.trigger_user_event(1);
        source.trigger_other_event(2);
        source.trigger_other_event(3);

        assert!(user.test_times_called(1));
        assert!(other.test_times_called(2));
    }
}
