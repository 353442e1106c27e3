use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use core::fmt;

use crate::array::ArrayValue;
use crate::info::TypePath;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ObjectBody

/// The payload of an [`Object`] beside its named fields.
#[derive(Clone, Debug)]
pub enum ObjectBody {
    /// Named fields only.
    Record,
    /// Ordered items of a collection.
    Sequence(Vec<Value>),
    /// Key-value pairs of a dictionary, in insertion order.
    Map(Vec<(Value, Value)>),
    /// A rectangular array.
    Array(ArrayValue),
}

impl ObjectBody {
    /// A short name of the body kind, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ObjectBody::Record => "record",
            ObjectBody::Sequence(_) => "sequence",
            ObjectBody::Map(_) => "map",
            ObjectBody::Array(_) => "array",
        }
    }
}

// -----------------------------------------------------------------------------
// Object

/// A dynamically typed instance.
///
/// Collections and dictionaries may also carry named fields, they are
/// serialized next to the items.
#[derive(Clone, Debug)]
pub struct Object {
    ty: TypePath,
    fields: Vec<(Arc<str>, Value)>,
    body: ObjectBody,
}

impl Object {
    #[inline]
    pub fn new(ty: impl Into<TypePath>, body: ObjectBody) -> Self {
        Self {
            ty: ty.into(),
            fields: Vec::new(),
            body,
        }
    }

    #[inline]
    pub fn record(ty: impl Into<TypePath>) -> Self {
        Self::new(ty, ObjectBody::Record)
    }

    /// Builder form of [`Object::set_field`].
    #[inline]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_field(name, value.into());
        self
    }

    #[inline]
    pub fn ty(&self) -> &TypePath {
        &self.ty
    }

    /// Returns the value of a field slot, `None` if the slot was never set.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v)
    }

    /// Sets a field slot, returns the previous value.
    pub fn set_field(&mut self, name: &str, value: Value) -> Option<Value> {
        match self.fields.iter_mut().find(|(n, _)| &**n == name) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((Arc::from(name), value));
                None
            }
        }
    }

    /// Iterates over field slots in insertion order.
    #[inline]
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (&**n, v))
    }

    #[inline]
    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }

    #[inline]
    pub fn items(&self) -> Option<&[Value]> {
        match &self.body {
            ObjectBody::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match &self.body {
            ObjectBody::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[inline]
    pub fn array(&self) -> Option<&ArrayValue> {
        match &self.body {
            ObjectBody::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub fn array_mut(&mut self) -> Option<&mut ArrayValue> {
        match &mut self.body {
            ObjectBody::Array(array) => Some(array),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectId

/// The identity of an [`ObjectRef`], derived from its address.
///
/// Only meaningful while the instance is alive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObjectId(usize);

// -----------------------------------------------------------------------------
// ObjectRef

/// A shared handle to an [`Object`].
///
/// Clones of a handle refer to the same instance, which is how graphs
/// express shared references and cycles.
///
/// # Examples
///
/// ```
/// use og_reflect::value::{Object, ObjectRef, Value};
///
/// let ann = ObjectRef::new(Object::record("app::Person").with_field("name", "Ann"));
/// ann.borrow_mut().set_field("friend", Value::from(ann.clone()));
///
/// let friend = ann.borrow().field("friend").and_then(Value::as_object).cloned();
/// assert!(friend.is_some_and(|f| f.ptr_eq(&ann)));
/// ```
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    #[inline]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Returns the identity of the instance.
    #[inline]
    pub fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Returns `true` if both handles refer to the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the runtime type of the instance.
    ///
    /// # Panics
    ///
    /// Panics if the instance is mutably borrowed.
    #[inline]
    pub fn ty(&self) -> TypePath {
        self.0.borrow().ty.clone()
    }

    /// # Panics
    ///
    /// Panics if the instance is mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the instance is borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, Object>, BorrowError> {
        self.0.try_borrow()
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Object>, BorrowMutError> {
        self.0.try_borrow_mut()
    }
}

impl fmt::Debug for ObjectRef {
    // Fields are not printed, graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ObjectRef");
        s.field("id", &self.id());
        match self.0.try_borrow() {
            Ok(object) => s.field("ty", &object.ty),
            Err(_) => s.field("ty", &"<borrowed>"),
        };
        s.finish()
    }
}
