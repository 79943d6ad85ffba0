use std::fmt;

use crate::HandlerId;

type Release<'s> = Box<dyn FnOnce(HandlerId) -> bool + 's>;

/// Keeps a handler attached to a source until disposed or dropped.
///
/// Releasing happens at most once: the first [`dispose`](Self::dispose), or
/// the drop of the guard if `dispose` was never called.
pub(crate) struct Subscription<'s> {
    id: HandlerId,
    release: Option<Release<'s>>,
}

impl<'s> Subscription<'s> {
    pub(crate) fn new(id: HandlerId, release: impl FnOnce(HandlerId) -> bool + 's) -> Self {
        Self {
            id,
            release: Some(Box::new(release)),
        }
    }

    pub(crate) fn id(&self) -> HandlerId {
        self.id
    }

    pub(crate) fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Detach the handler. Returns `true` only for the call that released it.
    pub(crate) fn dispose(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                if !release(self.id) {
                    tracing::warn!(handler_id = self.id, "handler was already detached from source");
                }
                true
            }
            None => false,
        }
    }
}

impl Drop for Subscription<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
