use alloc::string::String;

use og_utils::hash::{HashMap, HashSet};

use crate::info::{EXCLUDE_FROM_SERIALIZATION, FieldInfo, TypePath};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ExclusionRules

/// Decides which properties are skipped by serialization.
///
/// A field is excluded when:
/// - it carries [`EXCLUDE_FROM_SERIALIZATION`], or
/// - it carries one of the ignored attributes, or
/// - its name is ignored for the owner type or one of the owner's base types.
///
/// # Examples
///
/// ```
/// use og_reflect::access::ExclusionRules;
/// use og_reflect::info::{FieldInfo, TypeInfo};
/// use og_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TypeInfo::record("app::Person"));
/// registry.register(TypeInfo::record("app::Employee").with_base("app::Person"));
///
/// let rules = ExclusionRules::new()
///     .with_ignored_property("app::Person", "password")
///     .with_ignored_attribute("NonSerialized");
///
/// let employee = "app::Employee".into();
/// assert!(rules.is_excluded(&registry, &employee, &FieldInfo::new("password", "String")));
/// assert!(rules.is_excluded(
///     &registry,
///     &employee,
///     &FieldInfo::new("cache", "String").with_attribute("NonSerialized"),
/// ));
/// assert!(!rules.is_excluded(&registry, &employee, &FieldInfo::new("name", "String")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExclusionRules {
    properties: HashMap<TypePath, HashSet<String>>,
    attributes: HashSet<String>,
}

impl ExclusionRules {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores the property `name` of `ty` and of types derived from it.
    pub fn ignore_property(&mut self, ty: impl Into<TypePath>, name: &str) {
        self.properties
            .entry(ty.into())
            .or_default()
            .insert(String::from(name));
    }

    /// Ignores every field carrying the attribute `name`.
    pub fn ignore_attribute(&mut self, name: &str) {
        self.attributes.insert(String::from(name));
    }

    #[inline]
    pub fn with_ignored_property(mut self, ty: impl Into<TypePath>, name: &str) -> Self {
        self.ignore_property(ty, name);
        self
    }

    #[inline]
    pub fn with_ignored_attribute(mut self, name: &str) -> Self {
        self.ignore_attribute(name);
        self
    }

    /// Returns `true` if `name` is ignored for exactly `ty`.
    pub fn is_property_ignored(&self, ty: &str, name: &str) -> bool {
        self.properties
            .get(ty)
            .is_some_and(|names| names.contains(name))
    }

    /// Returns `true` if `field` of `owner` must not be serialized.
    pub fn is_excluded(&self, registry: &TypeRegistry, owner: &TypePath, field: &FieldInfo) -> bool {
        let attributes = field.attributes();
        if attributes.contains(EXCLUDE_FROM_SERIALIZATION)
            || attributes.iter().any(|a| self.attributes.contains(a))
        {
            return true;
        }
        if self.properties.is_empty() {
            return false;
        }
        if self.is_property_ignored(owner.as_str(), field.name()) {
            return true;
        }
        registry
            .base_chain(owner.as_str())
            .any(|meta| self.is_property_ignored(meta.path().as_str(), field.name()))
    }
}
