use crate::{
    Callback, ErrorLog, FailureKind, LogEntry, ResetPolicy,
    callback::{CallbackSlot, Check},
};

/// A check selected for execution by [`Scope::advance`].
pub(crate) struct Dispatch<A> {
    pub(crate) slot: usize,
    pub(crate) position: usize,
    pub(crate) description: String,
    pub(crate) check: Check<A>,
}

/// Counters and callbacks for one stream of notifications.
///
/// Two counters advance together on every notification. `times_called` is
/// read by count assertions and `cursor` positions the callbacks. Under
/// [`ResetPolicy::ResetOnAssert`] a count assertion consumes both, so the
/// next notification is index 0 again, while a callback assertion consumes
/// only the cursor and the callback flags.
pub(crate) struct Scope<A> {
    name: String,
    times_called: usize,
    cursor: usize,
    slots: Vec<CallbackSlot<A>>,
    next_auto_position: usize,
}

impl<A> Scope<A> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            times_called: 0,
            cursor: 0,
            slots: Vec::new(),
            next_auto_position: 0,
        }
    }

    pub(crate) fn times_called(&self) -> usize {
        self.times_called
    }

    pub(crate) fn has_callbacks(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Register a callback and return the position it will fire at.
    pub(crate) fn add(&mut self, callback: Callback<A>) -> usize {
        let auto = callback.position().is_none();
        let slot = CallbackSlot::new(callback, self.next_auto_position);
        if auto {
            self.next_auto_position += 1;
        }
        let position = slot.position;
        self.slots.push(slot);
        position
    }

    /// Count one notification and select the callbacks due at its index.
    ///
    /// Selected slots are marked invoked before their checks run, so a
    /// notification raised from inside a check never runs them twice.
    pub(crate) fn advance(&mut self) -> Vec<Dispatch<A>> {
        self.times_called += 1;
        self.cursor += 1;
        let index = self.cursor - 1;

        let mut due = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.position == index && !slot.invoked {
                slot.invoked = true;
                due.push(Dispatch {
                    slot: i,
                    position: slot.position,
                    description: slot.description.clone(),
                    check: slot.check.clone(),
                });
            }
        }
        due
    }

    pub(crate) fn mark_failed(&mut self, slot: usize) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.failed = true;
        }
    }

    /// Compare the call count against `expected`, logging a mismatch.
    pub(crate) fn check_times_called(
        &mut self,
        expected: usize,
        policy: ResetPolicy,
        log: &mut ErrorLog,
    ) -> bool {
        let observed = self.times_called;
        let passed = observed == expected;
        if !passed {
            log.push(LogEntry::new(
                FailureKind::CountMismatch,
                self.name.as_str(),
                format!("expected {expected} call(s), observed {observed}"),
            ));
        }
        tracing::debug!(
            scope = %self.name,
            expected,
            observed,
            passed,
            "times called asserted"
        );
        policy.consume(&mut self.times_called);
        policy.consume(&mut self.cursor);
        passed
    }

    /// Check that every callback ran and none failed.
    ///
    /// Each callback that never ran adds one entry to the log. Failed checks
    /// were already logged when they ran, so they only affect the result.
    pub(crate) fn check_callbacks(&mut self, policy: ResetPolicy, log: &mut ErrorLog) -> bool {
        let mut passed = true;
        for slot in &self.slots {
            if !slot.invoked {
                passed = false;
                log.push(LogEntry::new(
                    FailureKind::NotInvoked,
                    slot.description.as_str(),
                    format!(
                        "not invoked: expected at call #{}, observed {} call(s)",
                        slot.position + 1,
                        self.cursor
                    ),
                ));
            } else if slot.failed {
                passed = false;
            }
        }
        tracing::debug!(
            scope = %self.name,
            callbacks = self.slots.len(),
            passed,
            "callbacks asserted"
        );
        if policy.is_reset_on_assert() {
            for slot in &mut self.slots {
                slot.reset();
            }
        }
        policy.consume(&mut self.cursor);
        passed
    }
}
