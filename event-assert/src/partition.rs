use std::{fmt, hash::Hash};

/// Classifies notification payloads into partitions.
///
/// An observer always keeps an aggregate counter for every notification it
/// sees. When [`classify`](Partition::classify) returns a key, the
/// notification is additionally counted, and dispatched to callbacks, in the
/// partition for that key. Positions inside a partition are independent of
/// the aggregate and of every other partition.
///
/// [`PropertyName`](crate::PropertyName) partitions
/// [`PropertyChanged`](crate::PropertyChanged) notifications by the property
/// they carry. [`Unpartitioned`] keeps only the aggregate.
pub trait Partition<A>: Hash + Eq + Clone + fmt::Display + 'static {
    /// Returns the partition this payload belongs to, if any.
    fn classify(args: &A) -> Option<Self>;
}

/// Partition for sources that only need the aggregate counter.
///
/// Used by [`EventAssertion`](crate::EventAssertion), where the observed
/// event is already a single channel.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct Unpartitioned;

impl<A> Partition<A> for Unpartitioned {
    fn classify(_args: &A) -> Option<Self> {
        None
    }
}

impl fmt::Display for Unpartitioned {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "all")
    }
}
