//! Decide how a type is walked.
//!
//! [`TypeClassifier::classify`] maps a [`TypePath`] to a cached [`ShapeInfo`]:
//!
//! 1. registered types flagged `SIMPLE` are [`Shape::Simple`];
//! 2. `u8[]` is an [`Shape::Array`] of `u8`;
//! 3. array syntax (`T[]`, `T[,]`) is an [`Shape::Array`] with element type and rank;
//! 4. flags gathered along the base chain: `ITERABLE` makes an
//!    [`Shape::Enumerable`], refined to [`Shape::Dictionary`] by `KEYED` or to
//!    [`Shape::Collection`] by `ORDERED`;
//! 5. everything else, unregistered types included, is [`Shape::Complex`].

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use og_utils::hash::HashMap;

use crate::info::{TypeFlags, TypePath};
use crate::registry::{TypeRegistry, TypeTraitAppend, TypeTraitDefault, TypeTraitInsert};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Shape

/// The walking strategy of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Leaf value written verbatim.
    Simple,
    /// Named properties only.
    Complex,
    /// Items can be enumerated, but the type is neither ordered nor keyed.
    Enumerable,
    /// Ordered items plus named properties.
    Collection,
    /// Key-value pairs plus named properties.
    Dictionary,
    /// Rectangular array of any rank.
    Array,
}

// -----------------------------------------------------------------------------
// ShapeInfo

/// The cached classification of one type.
///
/// Capability traits are resolved once here, so graph walks never search the
/// base chain per instance.
#[derive(Clone, Debug)]
pub struct ShapeInfo {
    ty: TypePath,
    shape: Shape,
    element_type: Option<TypePath>,
    key_type: Option<TypePath>,
    value_type: Option<TypePath>,
    rank: usize,
    construct: Option<TypeTraitDefault>,
    append: Option<TypeTraitAppend>,
    insert: Option<TypeTraitInsert>,
}

impl ShapeInfo {
    fn new(ty: TypePath, shape: Shape) -> Self {
        Self {
            ty,
            shape,
            element_type: None,
            key_type: None,
            value_type: None,
            rank: 0,
            construct: None,
            append: None,
            insert: None,
        }
    }

    #[inline]
    pub fn ty(&self) -> &TypePath {
        &self.ty
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.shape == Shape::Simple
    }

    /// Element type of arrays and collections.
    #[inline]
    pub fn element_type(&self) -> Option<&TypePath> {
        self.element_type.as_ref()
    }

    /// Key type of dictionaries.
    #[inline]
    pub fn key_type(&self) -> Option<&TypePath> {
        self.key_type.as_ref()
    }

    /// Value type of dictionaries.
    #[inline]
    pub fn value_type(&self) -> Option<&TypePath> {
        self.value_type.as_ref()
    }

    /// Rank of arrays, `0` for other shapes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The type's own construction trait.
    #[inline]
    pub fn construct(&self) -> Option<&TypeTraitDefault> {
        self.construct.as_ref()
    }

    /// The append trait, found along the base chain.
    #[inline]
    pub fn append(&self) -> Option<&TypeTraitAppend> {
        self.append.as_ref()
    }

    /// The keyed insert trait, found along the base chain.
    #[inline]
    pub fn insert(&self) -> Option<&TypeTraitInsert> {
        self.insert.as_ref()
    }
}

// -----------------------------------------------------------------------------
// TypeClassifier

/// Classifies types against a [`TypeRegistry`], caching the result per type.
///
/// The first classification of a type wins, later calls share it.
///
/// # Examples
///
/// ```
/// use og_reflect::classify::{Shape, TypeClassifier};
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// let map = registry.register_map("String", "i32");
/// let classifier = TypeClassifier::new(registry.into());
///
/// let info = classifier.classify(&map);
/// assert_eq!(info.shape(), Shape::Dictionary);
/// assert_eq!(info.key_type().map(|t| t.as_str()), Some("String"));
/// assert!(info.insert().is_some());
///
/// assert_eq!(classifier.classify(&"u8[]".into()).shape(), Shape::Array);
/// assert_eq!(classifier.classify(&"String".into()).shape(), Shape::Simple);
/// assert_eq!(classifier.classify(&"app::Unknown".into()).shape(), Shape::Complex);
/// ```
pub struct TypeClassifier {
    registry: Arc<TypeRegistry>,
    cache: RwLock<HashMap<TypePath, Arc<ShapeInfo>>>,
}

impl TypeClassifier {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the cached classification of `ty`, computing it on first use.
    pub fn classify(&self, ty: &TypePath) -> Arc<ShapeInfo> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned();
        if let Some(info) = cached {
            return info;
        }

        let info = Arc::new(self.compute(ty));
        log::trace!("classified `{ty}` as {:?}", info.shape);

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ty.clone())
            .or_insert(info)
            .clone()
    }

    /// Classifies the runtime type of a value, `None` for `Null`.
    pub fn classify_value(&self, value: &Value) -> Option<Arc<ShapeInfo>> {
        value.type_path().map(|ty| self.classify(&ty))
    }

    fn compute(&self, ty: &TypePath) -> ShapeInfo {
        let registry = &*self.registry;
        let path = ty.as_str();
        let flags = registry.inherited_flags(path);

        if flags.contains(TypeFlags::SIMPLE) {
            return ShapeInfo::new(ty.clone(), Shape::Simple);
        }

        if path == "u8[]" {
            let mut info = ShapeInfo::new(ty.clone(), Shape::Array);
            info.element_type = Some(TypePath::new("u8"));
            info.rank = 1;
            return info;
        }

        if let Some((element, rank)) = ty.array_element() {
            let mut info = ShapeInfo::new(ty.clone(), Shape::Array);
            info.element_type = Some(element);
            info.rank = rank;
            return info;
        }

        let shape = if !flags.contains(TypeFlags::ITERABLE) {
            Shape::Complex
        } else if flags.contains(TypeFlags::KEYED) {
            Shape::Dictionary
        } else if flags.contains(TypeFlags::ORDERED) {
            Shape::Collection
        } else {
            Shape::Enumerable
        };

        let mut info = ShapeInfo::new(ty.clone(), shape);
        info.construct = registry
            .get(path)
            .and_then(|meta| meta.get_trait::<TypeTraitDefault>())
            .cloned();

        if shape == Shape::Complex {
            return info;
        }

        // Item types come from the first type in the chain with generic arguments.
        let generics = registry
            .base_chain(path)
            .map(|meta| meta.type_info().generics())
            .find(|generics| !generics.is_empty());
        if let Some(generics) = generics {
            if shape == Shape::Dictionary {
                info.key_type = generics.first().cloned();
                info.value_type = generics.get(1).cloned();
            } else {
                info.element_type = generics.first().cloned();
            }
        }
        info.append = registry.get_type_trait::<TypeTraitAppend>(path).cloned();
        info.insert = registry.get_type_trait::<TypeTraitInsert>(path).cloned();
        info
    }
}

impl core::fmt::Debug for TypeClassifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeClassifier")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
