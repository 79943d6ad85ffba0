/// Define an `Arc<str>` identifier newtype.
///
/// Equality compares strings with a fast path for shared allocations. The
/// generated type is cheap to clone, hashes like its string, and converts
/// from `&str`, `String` and references to itself.
macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Ord, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(std::sync::Arc<str>);

        impl $name {
            pub fn new(name: &str) -> Self {
                Self(std::sync::Arc::from(name))
            }

            /// Returns the name as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                &*self.0 == other
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(std::sync::Arc::from(s))
            }
        }

        impl From<&$name> for $name {
            fn from(name: &$name) -> Self {
                name.clone()
            }
        }
    };
}

pub(crate) use name_type;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    name_type!(
        /// Used only by these tests.
        SampleName
    );

    #[test]
    fn clones_share_the_allocation() {
        let a = SampleName::new("x");
        let b = a.clone();
        assert!(std::sync::Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn equal_strings_hash_alike() {
        let mut set = HashSet::new();
        set.insert(SampleName::from("x"));
        assert!(set.contains(&SampleName::from(String::from("x"))));
        assert!(!set.contains(&SampleName::new("y")));
    }

    #[test]
    fn displays_and_compares_as_str() {
        let name = SampleName::new("volume");
        assert_eq!(name.to_string(), "volume");
        assert_eq!(name.as_str(), "volume");
        assert!(name == *"volume");
        assert_eq!(SampleName::from(&name), name);
    }
}
