use crate::ResetPolicy;

/// Configuration for an assertion façade.
///
/// Use the builder methods to customize, or [`Default`] for a façade that
/// keeps its state across assertions and is labelled after the observed
/// event.
///
/// # Examples
///
/// ```rust
/// use event_assert::{AssertConfig, ResetPolicy};
///
/// let config = AssertConfig::default()
///     .with_reset_policy(ResetPolicy::ResetOnAssert) // consume state on every assertion
///     .with_label("thermostat.temperature");        // name used in logs and error entries
///
/// assert!(config.reset_policy().is_reset_on_assert());
/// assert_eq!(config.label(), Some("thermostat.temperature"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssertConfig {
    /// Whether assertions consume the state they read.
    /// Default: [`ResetPolicy::Keep`]
    reset_policy: ResetPolicy,

    /// Name of the observer in tracing output and count-mismatch entries.
    /// Default: the observed event name, or `property_changed`.
    label: Option<String>,
}

impl AssertConfig {
    /// Set the reset policy applied after each assertion.
    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    /// Shorthand for `with_reset_policy(ResetPolicy::from(reset))`.
    pub fn with_reset_on_assert(self, reset: bool) -> Self {
        self.with_reset_policy(ResetPolicy::from(reset))
    }

    /// Returns the reset policy applied after each assertion.
    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    /// Set the label used to identify the observer.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the configured label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
