use std::fmt;

/// Controls whether assertions consume the state they read.
///
/// Every assertion reads one piece of observer state: a call counter, or the
/// invoked flags of a set of callbacks. The policy decides what happens to
/// that state after the assertion has been evaluated.
///
/// | Policy | After an assertion | Use case |
/// |--------|--------------------|----------|
/// | [`Keep`](Self::Keep) | State is left untouched | One assertion phase at the end of a test |
/// | [`ResetOnAssert`](Self::ResetOnAssert) | The state that was read goes back to zero | Several act/assert cycles over one observer |
///
/// Resetting only touches what the assertion read: asserting a property's
/// call count leaves the aggregate count and every callback alone, and
/// asserting callbacks rewinds their firing positions without touching the
/// call counters.
///
/// # Example
///
/// ```rust,ignore
/// assertion.set_reset_policy(ResetPolicy::ResetOnAssert);
///
/// source.trigger(10);
/// assert!(assertion.test_times_called(1));
/// // The count was consumed by the previous assertion.
/// assert!(assertion.test_times_called(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetPolicy {
    /// Assertions are pure reads. This is the default.
    #[default]
    Keep,

    /// Assertions reset the state they read after evaluating it.
    ResetOnAssert,
}

impl ResetPolicy {
    /// Returns `true` if this is the [`Keep`](Self::Keep) policy.
    pub fn is_keep(&self) -> bool {
        matches!(self, ResetPolicy::Keep)
    }

    /// Returns `true` if this is the [`ResetOnAssert`](Self::ResetOnAssert) policy.
    pub fn is_reset_on_assert(&self) -> bool {
        matches!(self, ResetPolicy::ResetOnAssert)
    }

    /// Apply the policy to a piece of state that was just read.
    pub(crate) fn consume<T: Default>(&self, value: &mut T) {
        if self.is_reset_on_assert() {
            *value = T::default();
        }
    }
}

impl From<bool> for ResetPolicy {
    fn from(reset_on_assert: bool) -> Self {
        if reset_on_assert {
            ResetPolicy::ResetOnAssert
        } else {
            ResetPolicy::Keep
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetPolicy::Keep => write!(f, "Keep"),
            ResetPolicy::ResetOnAssert => write!(f, "ResetOnAssert"),
        }
    }
}
