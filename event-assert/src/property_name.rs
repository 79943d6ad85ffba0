use crate::{Partition, PropertyChanged, name::name_type};

name_type!(
    /// Name of a property carried by a [`PropertyChanged`] notification.
    ///
    /// Property-change assertions partition their counters and callbacks by
    /// `PropertyName`, so two notifications for the same property name always
    /// land in the same partition.
    PropertyName
);

impl Partition<PropertyChanged> for PropertyName {
    fn classify(args: &PropertyChanged) -> Option<Self> {
        Some(args.property().clone())
    }
}
