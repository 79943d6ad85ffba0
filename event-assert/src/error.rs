use std::sync::Arc;

use crate::EventName;

/// The single error type for all event-assert operations.
///
/// Only construction can fail: binding an assertion to a source that does
/// not expose the requested notification. Failures observed while
/// notifications are flowing (failed checks, count mismatches, callbacks
/// that never ran) are never returned as errors. They are recorded in the
/// assertion's [`ErrorLog`](crate::ErrorLog) and surface as `false` results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Event '{0}' is not exposed by the source.")]
    UnknownEvent(EventName),

    #[error("External error: {0}")]
    External(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an error produced by a notification source.
    pub fn external(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::External(Arc::new(e))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownEvent(a), Self::UnknownEvent(b)) => a == b,
            (Self::External(a), Self::External(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Error {}
