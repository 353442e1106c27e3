use alloc::sync::Arc;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::info::{CustomAttributes, FieldInfo, TypePath};

// -----------------------------------------------------------------------------
// TypeFlags

bitflags! {
    /// Capabilities of a registered type.
    ///
    /// Flags of base types are inherited, see
    /// [`TypeClassifier`](crate::classify::TypeClassifier).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        /// Leaf value written verbatim: primitives, `String`, enums.
        const SIMPLE   = 1 << 0;
        /// Items can be enumerated.
        const ITERABLE = 1 << 1;
        /// Items have a stable order and can be appended.
        const ORDERED  = 1 << 2;
        /// Items are key-value pairs.
        const KEYED    = 1 << 3;
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Runtime description of a type.
///
/// # Examples
///
/// ```
/// use og_reflect::info::{TypeFlags, TypeInfo};
///
/// let info = TypeInfo::record("app::Employee")
///     .with_base("app::Person")
///     .with_field_of("salary", "f64");
///
/// assert_eq!(info.base().map(|b| b.as_str()), Some("app::Person"));
/// assert!(info.field("salary").is_some());
/// assert!(info.flags().is_empty());
///
/// let list = TypeInfo::collection("Vec<i32>").with_generics(["i32"]);
/// assert!(list.flags().contains(TypeFlags::ITERABLE | TypeFlags::ORDERED));
/// ```
#[derive(Clone, Debug)]
pub struct TypeInfo {
    path: TypePath,
    flags: TypeFlags,
    base: Option<TypePath>,
    generics: Vec<TypePath>,
    fields: Vec<FieldInfo>,
    variants: Vec<Arc<str>>,
    attributes: CustomAttributes,
}

impl TypeInfo {
    /// Creates a type info with the given flags and nothing else.
    pub fn new(path: impl Into<TypePath>, flags: TypeFlags) -> Self {
        Self {
            path: path.into(),
            flags,
            base: None,
            generics: Vec::new(),
            fields: Vec::new(),
            variants: Vec::new(),
            attributes: CustomAttributes::new(),
        }
    }

    /// A leaf type written verbatim.
    #[inline]
    pub fn simple(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeFlags::SIMPLE)
    }

    /// A simple type whose values are one of `variants`.
    ///
    /// The first variant is the default value.
    pub fn enumeration<'a>(
        path: impl Into<TypePath>,
        variants: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut info = Self::new(path, TypeFlags::SIMPLE);
        info.variants = variants.into_iter().map(Arc::from).collect();
        info
    }

    /// A user-defined type with named fields.
    #[inline]
    pub fn record(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeFlags::empty())
    }

    /// A type whose items can be enumerated but not appended.
    #[inline]
    pub fn enumerable(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeFlags::ITERABLE)
    }

    /// An ordered list, the first generic argument is the element type.
    #[inline]
    pub fn collection(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeFlags::ITERABLE | TypeFlags::ORDERED)
    }

    /// A key-value map, generic arguments are the key and value types.
    #[inline]
    pub fn dictionary(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeFlags::ITERABLE | TypeFlags::KEYED)
    }

    // -------------------------------------------------------------------------
    // Builders

    #[inline]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn with_base(mut self, base: impl Into<TypePath>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_generics<T: Into<TypePath>>(mut self, generics: impl IntoIterator<Item = T>) -> Self {
        self.generics = generics.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a field, replacing a previous field with the same name.
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Shorthand for `with_field(FieldInfo::new(name, ty))`.
    #[inline]
    pub fn with_field_of(self, name: &str, ty: impl Into<TypePath>) -> Self {
        self.with_field(FieldInfo::new(name, ty))
    }

    #[inline]
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.insert(name);
        self
    }

    // -------------------------------------------------------------------------
    // Getters

    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    /// Returns the flags declared by this type, without inherited ones.
    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.flags.contains(TypeFlags::SIMPLE)
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        !self.variants.is_empty()
    }

    #[inline]
    pub fn base(&self) -> Option<&TypePath> {
        self.base.as_ref()
    }

    #[inline]
    pub fn generics(&self) -> &[TypePath] {
        &self.generics
    }

    /// Returns the fields declared by this type, without inherited ones.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    #[inline]
    pub fn variants(&self) -> impl ExactSizeIterator<Item = &str> {
        self.variants.iter().map(|v| &**v)
    }

    /// Returns the shared variant name, if `name` is a variant of this enum.
    #[inline]
    pub fn variant(&self, name: &str) -> Option<&Arc<str>> {
        self.variants.iter().find(|v| &***v == name)
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
