//! Provide the dynamic value model.
//!
//! ## Menu
//!
//! - [`Value`]: `Null`, a [`Primitive`] leaf, or a shared [`ObjectRef`].
//! - [`Primitive`]: Built-in simple values and [`EnumValue`]s, see [`PrimitiveKind`].
//! - [`Object`]: Runtime type, named field slots and an [`ObjectBody`].
//! - [`ObjectRef`]: Shared handle whose address is the instance identity ([`ObjectId`]).
//! - [`graph_eq`]: Structural equality that also requires the same sharing.

// -----------------------------------------------------------------------------
// Modules

mod compare;
mod object;
mod primitive;

// -----------------------------------------------------------------------------
// Exports

pub use compare::graph_eq;
pub use object::{Object, ObjectBody, ObjectId, ObjectRef};
pub use primitive::{EnumValue, Primitive, PrimitiveKind};

use alloc::string::String;
use alloc::sync::Arc;

use crate::info::TypePath;

// -----------------------------------------------------------------------------
// Value

/// A node of an object graph.
///
/// # Examples
///
/// ```
/// use og_reflect::value::{Object, ObjectRef, Value};
///
/// assert!(Value::Null.is_null());
/// assert_eq!(Value::from(1.5_f64).type_path().unwrap().as_str(), "f64");
///
/// let person = Value::from(ObjectRef::new(Object::record("app::Person")));
/// assert_eq!(person.type_path().unwrap().as_str(), "app::Person");
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Simple(Primitive),
    Object(ObjectRef),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Value::Simple(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the runtime type, `None` for `Null` or a mutably borrowed object.
    pub fn type_path(&self) -> Option<TypePath> {
        match self {
            Value::Null => None,
            Value::Simple(p) => Some(p.type_path()),
            Value::Object(o) => o.try_borrow().ok().map(|o| o.ty().clone()),
        }
    }
}

impl From<Primitive> for Value {
    #[inline]
    fn from(value: Primitive) -> Self {
        Value::Simple(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(value: Object) -> Self {
        Value::Object(ObjectRef::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::Simple(Primitive::from(value))
                }
            }
        )*
    };
}

impl_value_from!(
    bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64, &str, String,
    Arc<str>, EnumValue,
);
