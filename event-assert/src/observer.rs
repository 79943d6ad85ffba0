use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    Callback, ErrorLog, FailureKind, Handler, LogEntry, Partition, ResetPolicy,
    callback::run_check,
    scope::{Dispatch, Scope},
};

struct ObserverState<A, P> {
    aggregate: Scope<A>,
    partitions: Vec<(P, Scope<A>)>,
    log: ErrorLog,
    policy: ResetPolicy,
}

impl<A, P: Partition<A>> ObserverState<A, P> {
    fn scope(&self, partition: Option<&P>) -> Option<&Scope<A>> {
        match partition {
            None => Some(&self.aggregate),
            Some(key) => self.partitions.iter().find(|(k, _)| k == key).map(|(_, s)| s),
        }
    }

    fn scope_mut(&mut self, partition: Option<&P>, label: &str) -> &mut Scope<A> {
        match partition {
            None => &mut self.aggregate,
            Some(key) => partition_mut(&mut self.partitions, key, label),
        }
    }
}

fn partition_name<P: fmt::Display>(label: &str, key: &P) -> String {
    format!("{label} [{key}]")
}

/// Find the scope for `key`, creating it on first use.
fn partition_mut<'a, A, P: Partition<A>>(
    partitions: &'a mut Vec<(P, Scope<A>)>,
    key: &P,
    label: &str,
) -> &'a mut Scope<A> {
    let index = match partitions.iter().position(|(k, _)| k == key) {
        Some(index) => index,
        None => {
            partitions.push((key.clone(), Scope::new(partition_name(label, key))));
            partitions.len() - 1
        }
    };
    &mut partitions[index].1
}

/// Counts notifications from one subscription and drives the callbacks
/// registered against them.
///
/// The observer itself never subscribes: the façades ask it for a
/// [`handler`](Self::handler) and attach that to their source. The handler
/// only holds a weak reference, so dropping the observer silences it even
/// if the source still holds the handler.
///
/// Notifications always count towards the aggregate scope. When the
/// partition `P` classifies a payload, it also counts towards that
/// partition's scope, which is created on first use.
pub(crate) struct Observer<A, P> {
    state: Rc<RefCell<ObserverState<A, P>>>,
    label: Rc<str>,
}

impl<A: 'static, P: Partition<A>> Observer<A, P> {
    pub(crate) fn new(label: &str, policy: ResetPolicy) -> Self {
        let state = ObserverState {
            aggregate: Scope::new(label),
            partitions: Vec::new(),
            log: ErrorLog::new(),
            policy,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            label: Rc::from(label),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Build the handler to attach to the source.
    pub(crate) fn handler(&self) -> Handler<A> {
        let state = Rc::downgrade(&self.state);
        let label = self.label.clone();
        Rc::new(move |args: &A| {
            if let Some(state) = state.upgrade() {
                Self::fire(&state, &label, args);
            }
        })
    }

    fn fire(state: &RefCell<ObserverState<A, P>>, label: &str, args: &A) {
        let partition = P::classify(args);
        let (times_called, due) = {
            let mut state = state.borrow_mut();
            let mut due: Vec<(Option<P>, Dispatch<A>)> = state
                .aggregate
                .advance()
                .into_iter()
                .map(|d| (None, d))
                .collect();
            if let Some(key) = &partition {
                let scope = state.scope_mut(Some(key), label);
                due.extend(scope.advance().into_iter().map(|d| (Some(key.clone()), d)));
            }
            (state.aggregate.times_called(), due)
        };

        match &partition {
            Some(key) => tracing::trace!(
                observer = %label,
                partition = %key,
                times_called,
                "notification observed"
            ),
            None => tracing::trace!(observer = %label, times_called, "notification observed"),
        }

        // The state borrow is released here: checks may read the source, or
        // raise further notifications that re-enter this observer.
        for (key, dispatch) in due {
            tracing::trace!(
                observer = %label,
                position = dispatch.position,
                callback = %dispatch.description,
                "dispatching callback"
            );
            if let Err(detail) = run_check(&dispatch.check, args) {
                tracing::warn!(
                    observer = %label,
                    position = dispatch.position,
                    callback = %dispatch.description,
                    error = %detail,
                    "callback check failed"
                );
                let mut state = state.borrow_mut();
                state.scope_mut(key.as_ref(), label).mark_failed(dispatch.slot);
                state.log.push(LogEntry::new(
                    FailureKind::CheckFailed,
                    dispatch.description,
                    detail,
                ));
            }
        }
    }

    /// Register a callback in the aggregate scope (`None`) or a partition.
    pub(crate) fn add_callback(&self, partition: Option<&P>, callback: Callback<A>) -> usize {
        let mut state = self.state.borrow_mut();
        state.scope_mut(partition, &self.label).add(callback)
    }

    pub(crate) fn times_called(&self, partition: Option<&P>) -> usize {
        self.state
            .borrow()
            .scope(partition)
            .map_or(0, Scope::times_called)
    }

    pub(crate) fn test_times_called(&self, partition: Option<&P>, expected: usize) -> bool {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let policy = state.policy;
        match partition {
            None => state.aggregate.check_times_called(expected, policy, &mut state.log),
            Some(key) => match state.partitions.iter_mut().find(|(k, _)| k == key) {
                Some((_, scope)) => scope.check_times_called(expected, policy, &mut state.log),
                // Never notified: assert against an empty scope without creating one.
                None => Scope::<A>::new(partition_name(&self.label, key)).check_times_called(
                    expected,
                    policy,
                    &mut state.log,
                ),
            },
        }
    }

    pub(crate) fn test_callbacks_invoked(&self, partition: Option<&P>) -> bool {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let policy = state.policy;
        let scope = match partition {
            None => &mut state.aggregate,
            Some(key) => match state.partitions.iter_mut().find(|(k, _)| k == key) {
                Some((_, scope)) => scope,
                None => return true,
            },
        };
        scope.check_callbacks(policy, &mut state.log)
    }

    /// Evaluate the callbacks of the aggregate scope and of every partition.
    ///
    /// Every scope is evaluated, and reset, even after one has failed.
    pub(crate) fn test_every_callback(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let policy = state.policy;
        let mut passed = state.aggregate.check_callbacks(policy, &mut state.log);
        for (_, scope) in state.partitions.iter_mut().filter(|(_, s)| s.has_callbacks()) {
            passed &= scope.check_callbacks(policy, &mut state.log);
        }
        passed
    }

    pub(crate) fn partitions(&self) -> Vec<P> {
        self.state
            .borrow()
            .partitions
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub(crate) fn reset_policy(&self) -> ResetPolicy {
        self.state.borrow().policy
    }

    pub(crate) fn set_reset_policy(&self, policy: ResetPolicy) {
        self.state.borrow_mut().policy = policy;
    }

    pub(crate) fn error_log(&self) -> ErrorLog {
        self.state.borrow().log.clone()
    }

    pub(crate) fn error_count(&self) -> usize {
        self.state.borrow().log.len()
    }

    pub(crate) fn error_messages(&self) -> String {
        self.state.borrow().log.joined_message()
    }

    pub(crate) fn clear_errors(&self) {
        self.state.borrow_mut().log.clear();
    }
}

impl<A, P> fmt::Debug for Observer<A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Observer")
                .field("label", &self.label)
                .field("times_called", &state.aggregate.times_called())
                .field("partitions", &state.partitions.len())
                .field("errors", &state.log.len())
                .field("policy", &state.policy)
                .finish(),
            Err(_) => f
                .debug_struct("Observer")
                .field("label", &self.label)
                .finish_non_exhaustive(),
        }
    }
}
