use std::fmt;

use crate::{
    AssertConfig, Callback, ErrorLog, PropertyChangeSource, PropertyChanged, PropertyName,
    ResetPolicy, observer::Observer, subscription::Subscription,
};

const DEFAULT_LABEL: &str = "property_changed";

/// Assertions over the property-change notification of a source.
///
/// Every notification is counted twice: once in the aggregate
/// ("on changed") scope, and once in the scope of the property it names.
/// Callbacks can be registered against either, and positions inside each
/// scope are independent, so a callback at position 1 for `"volume"` runs
/// on the second change of `volume` no matter how many other properties
/// changed in between.
///
/// | Scope       | Register with                                        | Assert with |
/// |-------------|------------------------------------------------------|-------------|
/// | property    | [`add_callback`](Self::add_callback)                 | [`test_property_called`](Self::test_property_called), [`test_callbacks_invoked`](Self::test_callbacks_invoked) |
/// | aggregate   | [`add_on_changed_callback`](Self::add_on_changed_callback) | [`test_on_changed_times_called`](Self::test_on_changed_times_called) |
/// | all         |                                                      | [`test_all_callbacks_invoked`](Self::test_all_callbacks_invoked) |
///
/// The handler is detached by [`dispose`](Self::dispose) or on drop.
pub struct PropertyChangeAssertion<'s> {
    observer: Observer<PropertyChanged, PropertyName>,
    subscription: Subscription<'s>,
}

impl<'s> PropertyChangeAssertion<'s> {
    pub fn new<S>(source: &'s S) -> Self
    where
        S: PropertyChangeSource + ?Sized,
    {
        Self::with_config(source, AssertConfig::default())
    }

    pub fn with_config<S>(source: &'s S, config: AssertConfig) -> Self
    where
        S: PropertyChangeSource + ?Sized,
    {
        let observer = Observer::new(
            config.label().unwrap_or(DEFAULT_LABEL),
            config.reset_policy(),
        );
        let id = source.subscribe_property_changed(observer.handler());
        tracing::debug!(
            observer = observer.label(),
            handler_id = id,
            "property assertion subscribed"
        );

        let subscription =
            Subscription::new(id, move |id| source.unsubscribe_property_changed(id));
        Self {
            observer,
            subscription,
        }
    }

    /// Register a callback that runs on changes of `property`.
    ///
    /// Returns the position, counted in changes of that property, the
    /// callback will run at.
    pub fn add_callback(
        &mut self,
        property: impl Into<PropertyName>,
        callback: Callback<PropertyChanged>,
    ) -> usize {
        self.observer.add_callback(Some(&property.into()), callback)
    }

    /// Register a callback that runs on changes of any property.
    pub fn add_on_changed_callback(&mut self, callback: Callback<PropertyChanged>) -> usize {
        self.observer.add_callback(None, callback)
    }

    /// Returns `true` if `property` changed exactly `expected` times.
    ///
    /// A property that never changed counts as zero changes.
    pub fn test_property_called(
        &mut self,
        expected: usize,
        property: impl Into<PropertyName>,
    ) -> bool {
        self.observer
            .test_times_called(Some(&property.into()), expected)
    }

    /// Returns `true` if every callback registered for `property` ran and
    /// none failed.
    pub fn test_callbacks_invoked(&mut self, property: impl Into<PropertyName>) -> bool {
        self.observer.test_callbacks_invoked(Some(&property.into()))
    }

    /// Both per-property assertions. Both always run.
    pub fn test_property_all(&mut self, expected: usize, property: impl Into<PropertyName>) -> bool {
        let property = property.into();
        let count = self.test_property_called(expected, property.clone());
        let callbacks = self.test_callbacks_invoked(property);
        count && callbacks
    }

    /// Returns `true` if properties changed exactly `expected` times in
    /// total.
    pub fn test_on_changed_times_called(&mut self, expected: usize) -> bool {
        self.observer.test_times_called(None, expected)
    }

    /// Returns `true` if every callback, aggregate and per property, ran and
    /// none failed. Every scope is evaluated.
    pub fn test_all_callbacks_invoked(&mut self) -> bool {
        self.observer.test_every_callback()
    }

    /// [`test_on_changed_times_called`](Self::test_on_changed_times_called)
    /// and [`test_all_callbacks_invoked`](Self::test_all_callbacks_invoked).
    pub fn test_on_changed_all(&mut self, expected: usize) -> bool {
        let count = self.test_on_changed_times_called(expected);
        let callbacks = self.test_all_callbacks_invoked();
        count && callbacks
    }

    pub fn property_times_called(&self, property: impl Into<PropertyName>) -> usize {
        self.observer.times_called(Some(&property.into()))
    }

    pub fn on_changed_times_called(&self) -> usize {
        self.observer.times_called(None)
    }

    /// Properties that changed or have callbacks, in first-seen order.
    pub fn properties(&self) -> Vec<PropertyName> {
        self.observer.partitions()
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.observer.reset_policy()
    }

    pub fn set_reset_policy(&mut self, policy: ResetPolicy) {
        self.observer.set_reset_policy(policy);
    }

    pub fn error_messages(&self) -> String {
        self.observer.error_messages()
    }

    pub fn error_log(&self) -> ErrorLog {
        self.observer.error_log()
    }

    pub fn error_count(&self) -> usize {
        self.observer.error_count()
    }

    pub fn clear_errors(&mut self) {
        self.observer.clear_errors();
    }

    /// Detach from the source. Idempotent.
    pub fn dispose(&mut self) {
        if self.subscription.dispose() {
            tracing::debug!(observer = self.observer.label(), "property assertion disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        !self.subscription.is_active()
    }
}

impl fmt::Debug for PropertyChangeAssertion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChangeAssertion")
            .field("handler_id", &self.subscription.id())
            .field("observer", &self.observer)
            .field("disposed", &!self.subscription.is_active())
            .finish()
    }
}
