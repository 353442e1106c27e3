use alloc::sync::Arc;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// CustomAttributes

/// Marks a field or a type that is never serialized.
///
/// [`ReflectAccessor`](crate::access::ReflectAccessor) always honours it,
/// regardless of the configured exclusion rules.
pub const EXCLUDE_FROM_SERIALIZATION: &str = "ExcludeFromSerialization";

/// A collection of named marker attributes for a type or a field.
///
/// Attributes are identified by name, so there can only be one attribute per
/// name. Insertion order is kept.
///
/// # Example
///
/// ```
/// use og_reflect::info::{CustomAttributes, EXCLUDE_FROM_SERIALIZATION};
///
/// let attrs = CustomAttributes::new()
///     .with_attribute("Obsolete")
///     .with_attribute(EXCLUDE_FROM_SERIALIZATION);
///
/// assert!(attrs.contains(EXCLUDE_FROM_SERIALIZATION));
/// assert!(!attrs.contains("Serializable"));
/// assert_eq!(attrs.len(), 2);
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct CustomAttributes {
    names: Vec<Arc<str>>,
}

impl CustomAttributes {
    /// Creates an empty [`CustomAttributes`].
    ///
    /// Equivalent to [`Default`], but this is const function.
    #[inline]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Adds an attribute, ignoring duplicates.
    #[inline]
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.insert(name);
        self
    }

    /// Adds an attribute, returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(Arc::from(name));
        true
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| &**n == name)
    }

    /// Returns `true` if any attribute in `names` is present.
    pub fn contains_any<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> bool {
        names.any(|name| self.contains(name))
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.names.iter().map(|n| &**n)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
