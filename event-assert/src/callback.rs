use std::{
    any::Any,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

/// Converts the return value of a check into pass or fail.
///
/// Implemented for `()`, where only a panic counts as a failure, and for
/// `Result<(), E>`, where an `Err` also fails with `E`'s display text.
pub trait CheckOutcome {
    fn into_outcome(self) -> Result<(), String>;
}

impl CheckOutcome for () {
    fn into_outcome(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: fmt::Display> CheckOutcome for Result<(), E> {
    fn into_outcome(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

pub(crate) type Check<A> = Rc<dyn Fn(&A) -> Result<(), String>>;

/// An expectation to run when a notification fires at a given position.
///
/// A callback runs exactly once, on the notification whose zero-based index
/// equals its position. Without [`at`](Self::at), the assertion assigns the
/// next free automatic position (0, 1, 2, ... in registration order).
///
/// The check fails if it panics (so `assert!` and friends work as usual) or,
/// when it returns a `Result`, if it returns `Err`. Failures are recorded in
/// the assertion's error log and never reach the code that raised the
/// notification.
///
/// A panicking check still runs the process panic hook, so with the default
/// hook every failure also prints a `panicked at` message to stderr. Return
/// a `Result` instead when failures should only show up in the error log.
///
/// # Example
///
/// ```rust,ignore
/// use event_assert::Callback;
///
/// // Runs on the first notification.
/// assertion.add_callback(Callback::new(|e: &Reading| assert!(e.value >= 0)));
///
/// // Runs on the third notification.
/// assertion.add_callback(
///     Callback::new(|e: &Reading| assert_eq!(e.value, 30))
///         .at(2)
///         .describe("third reading is 30"),
/// );
///
/// // Fallible checks report their error text.
/// assertion.add_callback(Callback::new(|e: &Reading| {
///     if e.value < 100 { Ok(()) } else { Err(format!("{} is out of range", e.value)) }
/// }));
/// ```
pub struct Callback<A> {
    position: Option<usize>,
    description: Option<String>,
    check: Check<A>,
}

impl<A: 'static> Callback<A> {
    pub fn new<F, R>(check: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
        R: CheckOutcome,
    {
        Self {
            position: None,
            description: None,
            check: Rc::new(move |args: &A| check(args).into_outcome()),
        }
    }
}

impl<A> Callback<A> {
    /// Run on the notification with this zero-based index.
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Text used in error log entries about this callback.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the explicit position, if one was set.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("position", &self.position)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A callback registered with an observer scope.
pub(crate) struct CallbackSlot<A> {
    pub(crate) position: usize,
    pub(crate) description: String,
    pub(crate) check: Check<A>,
    pub(crate) invoked: bool,
    pub(crate) failed: bool,
}

impl<A> CallbackSlot<A> {
    /// Resolve a callback into a slot, assigning `auto_position` when the
    /// callback has none.
    pub(crate) fn new(callback: Callback<A>, auto_position: usize) -> Self {
        let position = callback.position.unwrap_or(auto_position);
        let description = callback
            .description
            .unwrap_or_else(|| format!("callback at call #{}", position + 1));
        Self {
            position,
            description,
            check: callback.check,
            invoked: false,
            failed: false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.invoked = false;
        self.failed = false;
    }
}

/// Run a check, turning panics into failures.
pub(crate) fn run_check<A>(check: &Check<A>, args: &A) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| check(args))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(panic_detail(payload)),
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    }
}
