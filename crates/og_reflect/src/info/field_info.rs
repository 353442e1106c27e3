use alloc::sync::Arc;

use crate::info::{CustomAttributes, TypePath};

// -----------------------------------------------------------------------------
// FieldInfo

/// Information for a named field.
///
/// `optional` fields accept `Null` even when their type is simple.
///
/// # Examples
///
/// ```
/// use og_reflect::info::FieldInfo;
///
/// let field = FieldInfo::new("age", "i32").optional().with_attribute("Range");
///
/// assert_eq!(field.name(), "age");
/// assert_eq!(field.ty().as_str(), "i32");
/// assert!(field.is_optional());
/// assert!(field.has_attribute("Range"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    name: Arc<str>,
    ty: TypePath,
    optional: bool,
    attributes: CustomAttributes,
}

impl FieldInfo {
    /// Creates a new required field.
    #[inline]
    pub fn new(name: &str, ty: impl Into<TypePath>) -> Self {
        Self {
            name: Arc::from(name),
            ty: ty.into(),
            optional: false,
            attributes: CustomAttributes::new(),
        }
    }

    /// Marks the field as optional.
    #[inline]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[inline]
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.insert(name);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared name, cheap to clone.
    #[inline]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub fn ty(&self) -> &TypePath {
        &self.ty
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}
