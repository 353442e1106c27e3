use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::access::AccessError;
use crate::info::TypePath;
use crate::registry::TypeRegistry;
use crate::registry::type_trait::impl_type_trait;
use crate::value::{Object, ObjectBody, Primitive, Value};

// -----------------------------------------------------------------------------
// TypeTraitDefault

/// Creates a default instance of a type.
///
/// Registering a type through [`TypeRegistry::register`] inserts the standard
/// constructor, which builds an empty object whose simple fields hold their
/// zero values.
///
/// # Examples
///
/// ```
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::{TypeRegistry, TypeTraitDefault};
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TypeInfo::record("app::Point").with_field_of("x", "i32"));
///
/// let generator = registry
///     .get("app::Point").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let point = generator.default(&registry);
/// let point = point.as_object().unwrap().borrow();
/// assert_eq!(point.ty().as_str(), "app::Point");
/// assert!(point.field("x").is_some());
/// ```
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: Arc<dyn Fn(&TypeRegistry) -> Value + Send + Sync>,
}

impl TypeTraitDefault {
    #[inline]
    pub fn new(func: impl Fn(&TypeRegistry) -> Value + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }

    /// Always returns a clone of `value`.
    #[inline]
    pub fn constant(value: Primitive) -> Self {
        Self::new(move |_| Value::Simple(value.clone()))
    }

    /// The standard constructor, see [`TypeRegistry::new_instance`].
    #[inline]
    pub fn standard(path: TypePath) -> Self {
        Self::new(move |registry| {
            registry
                .new_instance(path.as_str())
                .unwrap_or_else(|| Value::from(Object::record(path.clone())))
        })
    }

    /// Creates a default instance.
    #[inline]
    pub fn default(&self, registry: &TypeRegistry) -> Value {
        (self.func)(registry)
    }
}

impl fmt::Debug for TypeTraitDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitDefault")
    }
}

// -----------------------------------------------------------------------------
// TypeTraitAppend

/// Appends an item to a collection instance.
#[derive(Clone, Copy)]
pub struct TypeTraitAppend {
    func: fn(&mut Object, Value) -> Result<(), AccessError>,
}

impl TypeTraitAppend {
    #[inline]
    pub const fn new(func: fn(&mut Object, Value) -> Result<(), AccessError>) -> Self {
        Self { func }
    }

    /// Pushes to an [`ObjectBody::Sequence`].
    #[inline]
    pub const fn sequence() -> Self {
        Self::new(append_sequence)
    }

    #[inline]
    pub fn append(&self, target: &mut Object, item: Value) -> Result<(), AccessError> {
        (self.func)(target, item)
    }
}

impl fmt::Debug for TypeTraitAppend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitAppend")
    }
}

// -----------------------------------------------------------------------------
// TypeTraitInsert

/// Inserts a key-value pair into a dictionary instance.
#[derive(Clone, Copy)]
pub struct TypeTraitInsert {
    func: fn(&mut Object, Value, Value) -> Result<(), AccessError>,
}

impl TypeTraitInsert {
    #[inline]
    pub const fn new(func: fn(&mut Object, Value, Value) -> Result<(), AccessError>) -> Self {
        Self { func }
    }

    /// Inserts into an [`ObjectBody::Map`], replacing the value of an equal key.
    ///
    /// Simple keys are equal by value, object keys by identity.
    #[inline]
    pub const fn map() -> Self {
        Self::new(insert_map)
    }

    #[inline]
    pub fn insert(&self, target: &mut Object, key: Value, value: Value) -> Result<(), AccessError> {
        (self.func)(target, key, value)
    }
}

impl fmt::Debug for TypeTraitInsert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitInsert")
    }
}

fn append_sequence(target: &mut Object, item: Value) -> Result<(), AccessError> {
    match target.body_mut() {
        ObjectBody::Sequence(items) => {
            items.push(item);
            Ok(())
        }
        other => Err(AccessError::BodyMismatch {
            expected: "sequence",
            found: other.kind_name(),
        }),
    }
}

fn insert_map(target: &mut Object, key: Value, value: Value) -> Result<(), AccessError> {
    match target.body_mut() {
        ObjectBody::Map(entries) => {
            insert_entry(entries, key, value);
            Ok(())
        }
        other => Err(AccessError::BodyMismatch {
            expected: "map",
            found: other.kind_name(),
        }),
    }
}

fn insert_entry(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    let same = |other: &Value| match (&key, other) {
        (Value::Null, Value::Null) => true,
        (Value::Simple(a), Value::Simple(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
        _ => false,
    };
    match entries.iter_mut().find(|(k, _)| same(k)) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key, value)),
    }
}

impl_type_trait!(TypeTraitDefault, TypeTraitAppend, TypeTraitInsert);
