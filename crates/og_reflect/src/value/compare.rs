use og_utils::hash::HashMap;

use crate::value::{Object, ObjectBody, ObjectId, ObjectRef, Value};

// -----------------------------------------------------------------------------
// graph_eq

/// Compares two graphs structurally.
///
/// Two graphs are equal if they have the same shape, the same simple values,
/// and the same sharing: an instance reachable twice in `a` must correspond to
/// one instance reachable twice in `b`. Cycles are handled.
///
/// Unset field slots compare equal to `Null`. Objects that are mutably
/// borrowed compare unequal.
///
/// # Examples
///
/// ```
/// use og_reflect::value::{graph_eq, Object, ObjectRef, Value};
///
/// let make = || {
///     let node = ObjectRef::new(Object::record("app::Node"));
///     node.borrow_mut().set_field("next", Value::from(node.clone()));
///     Value::from(node)
/// };
///
/// assert!(graph_eq(&make(), &make()));
///
/// let open = Value::from(Object::record("app::Node").with_field("next", Value::Null));
/// assert!(!graph_eq(&make(), &open));
/// ```
pub fn graph_eq(a: &Value, b: &Value) -> bool {
    GraphEq::default().values(a, b)
}

#[derive(Default)]
struct GraphEq {
    forward: HashMap<ObjectId, ObjectId>,
    backward: HashMap<ObjectId, ObjectId>,
}

impl GraphEq {
    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Simple(x), Value::Simple(y)) => x == y,
            (Value::Object(x), Value::Object(y)) => self.objects(x, y),
            _ => false,
        }
    }

    fn objects(&mut self, a: &ObjectRef, b: &ObjectRef) -> bool {
        let (ia, ib) = (a.id(), b.id());
        match (self.forward.get(&ia), self.backward.get(&ib)) {
            (Some(mapped), _) => return *mapped == ib,
            (None, Some(_)) => return false,
            (None, None) => {}
        }
        // Pair before descending, cycles come back here.
        self.forward.insert(ia, ib);
        self.backward.insert(ib, ia);

        let (Ok(x), Ok(y)) = (a.try_borrow(), b.try_borrow()) else {
            return false;
        };
        self.object_bodies(&x, &y)
    }

    fn object_bodies(&mut self, a: &Object, b: &Object) -> bool {
        if a.ty() != b.ty() {
            return false;
        }
        for (name, value) in a.fields() {
            if !self.values(value, b.field(name).unwrap_or(&Value::Null)) {
                return false;
            }
        }
        if b
            .fields()
            .any(|(name, value)| a.field(name).is_none() && !value.is_null())
        {
            return false;
        }

        match (a.body(), b.body()) {
            (ObjectBody::Record, ObjectBody::Record) => true,
            (ObjectBody::Sequence(x), ObjectBody::Sequence(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(x, y)| self.values(x, y))
            }
            (ObjectBody::Map(x), ObjectBody::Map(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .zip(y)
                        .all(|((xk, xv), (yk, yv))| self.values(xk, yk) && self.values(xv, yv))
            }
            (ObjectBody::Array(x), ObjectBody::Array(y)) => {
                x.element_type() == y.element_type()
                    && x.dimensions() == y.dimensions()
                    && x.items().iter().zip(y.items()).all(|(x, y)| self.values(x, y))
            }
            _ => false,
        }
    }
}
