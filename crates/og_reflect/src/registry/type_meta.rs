use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::ops::{Deref, DerefMut};

use og_utils::TypeIdMap;

use crate::info::{CustomAttributes, FieldInfo, TypeFlags, TypeInfo, TypePath};
use crate::registry::{TypeTrait, TypeTraitAppend, TypeTraitDefault, TypeTraitInsert};
use crate::value::{EnumValue, PrimitiveKind};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for type metadata, registered into the
/// [`TypeRegistry`](crate::registry::TypeRegistry).
///
/// This includes a [`TypeInfo`] and a [`TypeTrait`] table.
///
/// # Example
///
/// ```
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::{TypeMeta, TypeTraitAppend, TypeTraitDefault};
///
/// let meta = TypeMeta::standard(TypeInfo::collection("Vec<i32>").with_generics(["i32"]));
/// assert!(meta.has_trait::<TypeTraitDefault>());
/// assert!(meta.has_trait::<TypeTraitAppend>());
///
/// let mut meta = TypeMeta::new(TypeInfo::enumerable("app::Range"));
/// assert_eq!(meta.trait_len(), 0);
/// meta.insert_trait(TypeTraitAppend::sequence());
/// assert!(meta.get_trait::<TypeTraitAppend>().is_some());
/// ```
pub struct TypeMeta {
    type_info: TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Create a [`TypeMeta`] with an empty trait table.
    #[inline]
    pub fn new(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            trait_table: TypeIdMap::new(),
        }
    }

    /// Create a [`TypeMeta`] with an empty trait table of the given capacity.
    #[inline]
    pub fn with_capacity(type_info: TypeInfo, capacity: usize) -> Self {
        Self {
            type_info,
            trait_table: TypeIdMap::with_capacity(capacity),
        }
    }

    /// Create a [`TypeMeta`] with the standard traits for its flags.
    ///
    /// - simple types: a constant [`TypeTraitDefault`] for built-in kinds and enums.
    /// - other types: the standard [`TypeTraitDefault`].
    /// - `ORDERED`: [`TypeTraitAppend::sequence`].
    /// - `KEYED`: [`TypeTraitInsert::map`].
    pub fn standard(type_info: TypeInfo) -> Self {
        let mut meta = Self::with_capacity(type_info, 2);
        let info = &meta.type_info;
        let flags = info.flags();

        let default = if info.is_simple() {
            if let Some(variant) = info.variants().next() {
                Some(TypeTraitDefault::constant(
                    EnumValue::new(info.path(), variant).into(),
                ))
            } else {
                PrimitiveKind::from_path(info.path().as_str())
                    .map(|kind| TypeTraitDefault::constant(kind.default_value()))
            }
        } else {
            Some(TypeTraitDefault::standard(info.path().clone()))
        };

        if let Some(default) = default {
            meta.insert_trait(default);
        }
        if flags.contains(TypeFlags::KEYED) {
            meta.insert_trait(TypeTraitInsert::map());
        } else if flags.contains(TypeFlags::ORDERED) {
            meta.insert_trait(TypeTraitAppend::sequence());
        }
        meta
    }

    /// Builder form of [`TypeMeta::insert_trait`].
    #[inline]
    pub fn with_trait<T: TypeTrait>(mut self, data: T) -> Self {
        self.insert_trait(data);
        self
    }

    #[inline(always)]
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[inline]
    pub fn path(&self) -> &TypePath {
        self.type_info.path()
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.type_info.flags()
    }

    #[inline]
    pub fn base(&self) -> Option<&TypePath> {
        self.type_info.base()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        self.type_info.fields()
    }

    #[inline]
    pub fn custom_attributes(&self) -> &CustomAttributes {
        self.type_info.attributes()
    }

    /// Insert a new [`TypeTrait`], replacing one of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    /// Block code inline.
    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Removes a [`TypeTrait`] from the meta.
    #[inline]
    pub fn remove_trait<T: TypeTrait>(&mut self) -> Option<Box<T>> {
        self.remove_trait_by_id(TypeId::of::<T>())
            .and_then(|v| <Box<dyn Any>>::downcast::<T>(v).ok())
    }

    /// Removes a [`TypeTrait`] from the meta.
    pub fn remove_trait_by_id(&mut self, type_id: TypeId) -> Option<Box<dyn TypeTrait>> {
        self.trait_table.remove(&type_id)
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it's doesn't exist.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.get_trait_by_id(TypeId::of::<T>())
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it's doesn't exist.
    pub fn get_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.trait_table.get(&type_id).map(Deref::deref)
    }

    /// Get a mutable [`TypeTrait`] reference, or return `None` if it's doesn't exist.
    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .map(DerefMut::deref_mut)
            .and_then(<dyn TypeTrait>::downcast_mut)
    }

    /// Return true if specific [`TypeTrait`] is exist.
    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<T>())
    }

    /// Return the number of [`TypeTrait`].
    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }

    /// An iterator visiting all `TypeId - &dyn TypeTrait` pairs in arbitrary order.
    pub fn trait_iter(&self) -> impl Iterator<Item = (TypeId, &dyn TypeTrait)> {
        self.trait_table
            .iter()
            .map(|(key, val)| (*key, val.deref()))
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut new_map = TypeIdMap::with_capacity(self.trait_len());
        for (id, type_trait) in self.trait_table.iter() {
            new_map.insert(*id, (**type_trait).clone_type_trait());
        }

        Self {
            trait_table: new_map,
            type_info: self.type_info.clone(),
        }
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_info", &self.type_info)
            .field("trait_table", &self.trait_table)
            .finish()
    }
}
