#![cfg_attr(docsrs, feature(doc_cfg))]
//! # event-assert
//!
//! Count and callback assertions over the notifications an object raises.
//!
//! Attach an assertion to an object under test, exercise the object, then
//! ask how often a notification fired and whether the expectations you
//! registered ran and held. Assertions return `bool` and collect every
//! failure in an [`ErrorLog`], so one test run reports all the problems at
//! once.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use event_assert::{Callback, EventAssertion};
//!
//! let door = Door::default();
//! let mut opened = EventAssertion::new(&door, "opened")?;
//!
//! opened.add_callback(
//!     Callback::new(|e: &Opened| assert_eq!(e.by, "alice"))
//!         .describe("first opened by alice"),
//! );
//!
//! door.open("alice");
//! door.open("bob");
//!
//! assert!(opened.test_all(2), "{}", opened.error_messages());
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EventAssertion`] | Assertions over one named event |
//! | [`PropertyChangeAssertion`] | Assertions over property-change notifications, per property and in aggregate |
//! | [`Callback`] | An expectation that runs on the notification at a given position |
//! | [`ErrorLog`] | Every failure recorded by an assertion |
//! | [`EventSource`] / [`PropertyChangeSource`] | What the object under test implements |
//! | [`HandlerList`] | The handler list a source keeps per notification |
//! | [`AssertConfig`] | Reset policy and label for an assertion |
//!
//! ## Positions
//!
//! Notifications are indexed from zero. A callback registered
//! [`at`](Callback::at) position `p` runs once, on notification `p`. Without
//! an explicit position, callbacks take positions 0, 1, 2, ... in the order
//! they are added to an assertion. For property changes, positions count
//! changes of the callback's property only.
//!
//! ## Reset on assert
//!
//! With [`ResetPolicy::ResetOnAssert`], reading a count sets it back to
//! zero, and checking callbacks rewinds them so they can run again. See
//! [`ResetPolicy`].
//!
//! ## Features
//!
//! - **`mock`** - [`mock::MockEventSource`] and [`mock::MockPropertySource`], ready-made sources
//! - **`serde`** - Serialization of configuration and names, and JSON export of the error log (`ErrorLog::to_json()`)
//!
//! ## Examples
//!
//! - `thermostat.rs` - Asserting on a small device model (requires `mock`)

mod callback;
mod config;
mod error;
mod error_log;
mod event_assertion;
mod event_name;
mod handler;
mod name;
mod partition;
mod property_assertion;
mod property_name;
mod reset_policy;
mod source;

mod observer;
mod scope;
mod subscription;

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

pub use callback::{Callback, CheckOutcome};
pub use config::AssertConfig;
pub use error::Error;
pub use error_log::{ErrorLog, FailureKind, LogEntry};
pub use event_assertion::EventAssertion;
pub use event_name::EventName;
pub use handler::{Handler, HandlerId, HandlerList};
pub use partition::{Partition, Unpartitioned};
pub use property_assertion::PropertyChangeAssertion;
pub use property_name::PropertyName;
pub use reset_policy::ResetPolicy;
pub use source::{EventSource, PropertyChangeSource, PropertyChanged};

/// Convenience alias for `Result<T, event_assert::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
