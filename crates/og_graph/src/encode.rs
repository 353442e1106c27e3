//! Turn a value graph into a [`PropertyNode`] tree.

use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use og_reflect::access::PropertyAccessor;
use og_reflect::array::{ArrayIndexer, Dimension};
use og_reflect::classify::{Shape, TypeClassifier};
use og_reflect::info::TypePath;
use og_reflect::{Object, ObjectBody, ObjectId, ObjectRef, Value};
use og_utils::hash::HashMap;

use crate::error::EncodeError;
use crate::tree::{
    CollectionNode, ComplexNode, DictionaryNode, MultiArrayNode, NodeBody, NodeKind, PropertyNode,
    ReferenceInfo, ReferenceNode, SingleArrayNode,
};

// -----------------------------------------------------------------------------
// Snapshot

/// An owned copy of what an instance contributes to its node.
///
/// Taken under a short borrow, so children are encoded with no borrow held.
enum Snapshot {
    Complex,
    Collection {
        element_type: Option<TypePath>,
        items: Vec<Value>,
    },
    Dictionary {
        key_type: Option<TypePath>,
        value_type: Option<TypePath>,
        entries: Vec<(Value, Value)>,
    },
    SingleArray {
        element_type: TypePath,
        lower_bound: i32,
        items: Vec<Value>,
    },
    MultiArray {
        element_type: TypePath,
        dimensions: Vec<Dimension>,
        items: Vec<(Vec<i32>, Value)>,
    },
}

impl Snapshot {
    fn kind(&self) -> NodeKind {
        match self {
            Snapshot::Complex => NodeKind::Complex,
            Snapshot::Collection { .. } => NodeKind::Collection,
            Snapshot::Dictionary { .. } => NodeKind::Dictionary,
            Snapshot::SingleArray { .. } => NodeKind::SingleArray,
            Snapshot::MultiArray { .. } => NodeKind::MultiArray,
        }
    }
}

struct Target {
    id: u32,
    kind: NodeKind,
    ty: TypePath,
}

// -----------------------------------------------------------------------------
// GraphEncoder

/// Walks a value graph depth first and builds its property tree.
///
/// Instances are tracked by identity. The first encounter of an instance
/// produces its full node and registers it before any child is visited, later
/// encounters produce [`NodeKind::Reference`] placeholders. Reference counts
/// are written into the tree once the walk is done.
///
/// The encoder is consumed by [`GraphEncoder::encode`], its identity cache
/// lives for one call.
///
/// # Examples
///
/// ```
/// use og_graph::encode::GraphEncoder;
/// use og_graph::tree::NodeKind;
/// use og_reflect::access::{ExclusionRules, ReflectAccessor};
/// use og_reflect::classify::TypeClassifier;
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::TypeRegistry;
/// use og_reflect::value::{Object, ObjectRef, Value};
/// use std::sync::Arc;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeInfo::record("app::Person")
///         .with_field_of("name", "String")
///         .with_field_of("friend", "app::Person"),
/// );
/// let registry = Arc::new(registry);
/// let classifier = TypeClassifier::new(registry.clone());
/// let accessor = ReflectAccessor::new(registry, ExclusionRules::new());
///
/// let a = ObjectRef::new(Object::record("app::Person").with_field("name", "A"));
/// let b = ObjectRef::new(Object::record("app::Person").with_field("name", "B"));
/// a.borrow_mut().set_field("friend", b.clone().into());
/// b.borrow_mut().set_field("friend", a.clone().into());
///
/// let root = GraphEncoder::new(&classifier, &accessor)
///     .encode("Root", &Value::from(a))
///     .unwrap();
///
/// assert_eq!(root.kind(), NodeKind::Complex);
/// assert_eq!(root.reference().unwrap().id, 1);
/// let b_node = root.property("friend").unwrap();
/// let back = b_node.property("friend").unwrap();
/// assert_eq!(back.kind(), NodeKind::Reference);
/// assert_eq!(back.reference().unwrap().id, 1);
/// ```
pub struct GraphEncoder<'a, A: PropertyAccessor + ?Sized> {
    classifier: &'a TypeClassifier,
    accessor: &'a A,
    targets: HashMap<ObjectId, Target>,
    next_id: u32,
}

impl<'a, A: PropertyAccessor + ?Sized> GraphEncoder<'a, A> {
    pub fn new(classifier: &'a TypeClassifier, accessor: &'a A) -> Self {
        Self {
            classifier,
            accessor,
            targets: HashMap::default(),
            next_id: 1,
        }
    }

    /// Encodes `value` as the root node named `name`.
    pub fn encode(mut self, name: &str, value: &Value) -> Result<PropertyNode, EncodeError> {
        let mut root = self.encode_value(Arc::from(name), None, value)?;
        root.update_reference_counts();
        log::trace!("encoded `{name}` with {} reference targets", self.targets.len());
        Ok(root)
    }

    fn encode_value(
        &mut self,
        name: Arc<str>,
        declared_type: Option<TypePath>,
        value: &Value,
    ) -> Result<PropertyNode, EncodeError> {
        let (value_type, body) = match value {
            Value::Null => (None, NodeBody::Null),
            Value::Simple(primitive) => (Some(primitive.type_path()), NodeBody::Simple(primitive.clone())),
            Value::Object(object) => return self.encode_object(name, declared_type, object),
        };
        Ok(PropertyNode {
            name,
            declared_type,
            value_type,
            body,
        })
    }

    fn encode_object(
        &mut self,
        name: Arc<str>,
        declared_type: Option<TypePath>,
        object: &ObjectRef,
    ) -> Result<PropertyNode, EncodeError> {
        if let Some(target) = self.targets.get(&object.id()) {
            log::trace!("`{name}` refers to #{}", target.id);
            return Ok(PropertyNode {
                name,
                declared_type,
                value_type: Some(target.ty.clone()),
                body: NodeBody::Reference(ReferenceNode {
                    reference: ReferenceInfo::placeholder(target.id),
                    target: target.kind,
                }),
            });
        }

        let Ok(instance) = object.try_borrow() else {
            return Err(EncodeError::Borrowed { name });
        };
        let ty = instance.ty().clone();
        let snapshot = self.snapshot(&instance)?;
        let properties: Vec<(Arc<str>, TypePath, Value)> = self
            .accessor
            .properties(&ty)
            .iter()
            .map(|field| -> Result<_, EncodeError> {
                let value = self.accessor.get(&instance, field.name())?;
                Ok((field.name_arc().clone(), field.ty().clone(), value))
            })
            .collect::<Result<_, _>>()?;
        drop(instance);

        // Register before recursing, children may lead back to this instance.
        let id = self.next_id;
        self.next_id += 1;
        self.targets.insert(
            object.id(),
            Target {
                id,
                kind: snapshot.kind(),
                ty: ty.clone(),
            },
        );
        log::trace!("`{name}` is #{id} of `{ty}`");

        let reference = Some(ReferenceInfo::new(id));
        let body = match snapshot {
            Snapshot::Complex => NodeBody::Complex(ComplexNode {
                reference,
                properties: self.encode_properties(properties)?,
            }),
            Snapshot::Collection {
                element_type,
                items,
            } => NodeBody::Collection(CollectionNode {
                reference,
                properties: self.encode_properties(properties)?,
                items: self.encode_items(&element_type, &items)?,
                element_type,
            }),
            Snapshot::Dictionary {
                key_type,
                value_type,
                entries,
            } => {
                let properties = self.encode_properties(properties)?;
                let mut items = Vec::with_capacity(entries.len());
                for (key, value) in &entries {
                    let key = self.encode_value(Arc::from(""), key_type.clone(), key)?;
                    let value = self.encode_value(Arc::from(""), value_type.clone(), value)?;
                    items.push((key, value));
                }
                NodeBody::Dictionary(DictionaryNode {
                    reference,
                    properties,
                    key_type,
                    value_type,
                    items,
                })
            }
            Snapshot::SingleArray {
                element_type,
                lower_bound,
                items,
            } => {
                let element = Some(element_type);
                NodeBody::SingleArray(SingleArrayNode {
                    reference,
                    items: self.encode_items(&element, &items)?,
                    element_type: element,
                    lower_bound,
                })
            }
            Snapshot::MultiArray {
                element_type,
                dimensions,
                items,
            } => {
                let mut nodes = Vec::with_capacity(items.len());
                for (indexes, item) in items {
                    let node = self.encode_value(Arc::from(""), Some(element_type.clone()), &item)?;
                    nodes.push((indexes, node));
                }
                NodeBody::MultiArray(MultiArrayNode {
                    reference,
                    element_type: Some(element_type),
                    dimensions,
                    items: nodes,
                })
            }
        };

        Ok(PropertyNode {
            name,
            declared_type,
            value_type: Some(ty),
            body,
        })
    }

    /// Copies the body of `instance` after checking it against its type.
    fn snapshot(&self, instance: &Object) -> Result<Snapshot, EncodeError> {
        let info = self.classifier.classify(instance.ty());
        let snapshot = match (info.shape(), instance.body()) {
            (Shape::Complex, ObjectBody::Record) => Snapshot::Complex,
            (Shape::Collection | Shape::Enumerable, ObjectBody::Sequence(items)) => {
                Snapshot::Collection {
                    element_type: info.element_type().cloned(),
                    items: items.clone(),
                }
            }
            (Shape::Dictionary, ObjectBody::Map(entries)) => Snapshot::Dictionary {
                key_type: info.key_type().cloned(),
                value_type: info.value_type().cloned(),
                entries: entries.clone(),
            },
            (Shape::Array, ObjectBody::Array(array)) => {
                let element_type = info
                    .element_type()
                    .unwrap_or(array.element_type())
                    .clone();
                match array.dimensions() {
                    [single] => Snapshot::SingleArray {
                        element_type,
                        lower_bound: single.lower_bound,
                        items: ArrayIndexer::of(array)
                            .values(array)
                            .map(|(_, value)| value.clone())
                            .collect(),
                    },
                    dimensions => Snapshot::MultiArray {
                        element_type,
                        dimensions: dimensions.to_vec(),
                        items: ArrayIndexer::of(array)
                            .values(array)
                            .map(|(index, value)| (index.to_vec(), value.clone()))
                            .collect(),
                    },
                }
            }
            (shape, body) => {
                return Err(EncodeError::InvalidOperation {
                    ty: instance.ty().clone(),
                    reason: format!("a {shape:?} type cannot hold a {} body", body.kind_name()),
                });
            }
        };
        Ok(snapshot)
    }

    fn encode_properties(
        &mut self,
        properties: Vec<(Arc<str>, TypePath, Value)>,
    ) -> Result<Vec<PropertyNode>, EncodeError> {
        properties
            .into_iter()
            .map(|(name, ty, value)| self.encode_value(name, Some(ty), &value))
            .collect()
    }

    fn encode_items(
        &mut self,
        element_type: &Option<TypePath>,
        items: &[Value],
    ) -> Result<Vec<PropertyNode>, EncodeError> {
        items
            .iter()
            .map(|item| self.encode_value(Arc::from(""), element_type.clone(), item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;

    use og_reflect::access::{ExclusionRules, ReflectAccessor};
    use og_reflect::array::{ArrayValue, Dimension};
    use og_reflect::classify::TypeClassifier;
    use og_reflect::info::{EXCLUDE_FROM_SERIALIZATION, FieldInfo, TypeInfo};
    use og_reflect::registry::TypeRegistry;
    use og_reflect::{Object, ObjectBody, ObjectRef, Primitive, Value};

    use super::GraphEncoder;
    use crate::error::EncodeError;
    use crate::tree::{NodeBody, NodeKind, PropertyNode};

    fn setup() -> (TypeClassifier, ReflectAccessor) {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeInfo::record("app::Person")
                .with_field_of("name", "String")
                .with_field(FieldInfo::new("age", "i32").optional())
                .with_field_of("friend", "app::Person")
                .with_field(
                    FieldInfo::new("password", "String").with_attribute(EXCLUDE_FROM_SERIALIZATION),
                ),
        );
        registry.register_list("app::Person");
        registry.register_map("String", "i32");
        let registry = Arc::new(registry);
        (
            TypeClassifier::new(registry.clone()),
            ReflectAccessor::new(registry, ExclusionRules::new()),
        )
    }

    fn person(name: &str) -> ObjectRef {
        ObjectRef::new(Object::record("app::Person").with_field("name", name))
    }

    fn encode(value: &Value) -> Result<PropertyNode, EncodeError> {
        let (classifier, accessor) = setup();
        GraphEncoder::new(&classifier, &accessor).encode("Root", value)
    }

    #[test]
    fn null_and_simple_roots() {
        let node = encode(&Value::Null).unwrap();
        assert!(node.is_null());
        assert_eq!(&*node.name, "Root");

        let node = encode(&Value::from(7_u16)).unwrap();
        assert_eq!(node.body, NodeBody::Simple(Primitive::U16(7)));
        assert_eq!(node.value_type.as_ref().map(|t| t.as_str()), Some("u16"));
    }

    #[test]
    fn self_reference() {
        let ann = person("Ann");
        ann.borrow_mut().set_field("friend", ann.clone().into());

        let root = encode(&ann.into()).unwrap();
        let info = root.reference().unwrap();
        assert_eq!((info.id, info.count, info.processed), (1, 2, true));

        let back = root.property("friend").unwrap();
        assert_eq!(back.kind(), NodeKind::Reference);
        assert_eq!(back.declared_type.as_ref().map(|t| t.as_str()), Some("app::Person"));
        assert!(!back.reference().unwrap().processed);
    }

    #[test]
    fn shared_items_are_encoded_once() {
        let bob = person("Bob");
        let list = ObjectRef::new(Object::new(
            "Vec<app::Person>",
            ObjectBody::Sequence(vec![bob.clone().into(), Value::Null, bob.into()]),
        ));

        let root = encode(&list.into()).unwrap();
        let NodeBody::Collection(collection) = &root.body else {
            panic!("expected a collection, got {:?}", root.kind());
        };
        assert_eq!(collection.element_type.as_ref().map(|t| t.as_str()), Some("app::Person"));
        let kinds: vec::Vec<NodeKind> = collection.items.iter().map(PropertyNode::kind).collect();
        assert_eq!(kinds, [NodeKind::Complex, NodeKind::Null, NodeKind::Reference]);
        assert_eq!(collection.items[0].reference().unwrap().count, 2);
        assert_eq!(collection.items[2].reference().unwrap().id, 2);
    }

    #[test]
    fn excluded_properties_are_skipped() {
        let ann = person("Ann");
        ann.borrow_mut().set_field("password", Value::from("secret"));

        let root = encode(&ann.into()).unwrap();
        let names: vec::Vec<&str> = root.properties().iter().map(|p| &*p.name).collect();
        assert_eq!(names, ["name", "age", "friend"]);
        assert!(root.property("age").unwrap().is_null());
    }

    #[test]
    fn dictionaries_keep_entry_order() {
        let map = ObjectRef::new(Object::new(
            "Map<String, i32>",
            ObjectBody::Map(vec![
                (Value::from("b"), Value::from(2_i32)),
                (Value::from("a"), Value::from(1_i32)),
            ]),
        ));
        let root = encode(&map.into()).unwrap();
        let NodeBody::Dictionary(dictionary) = &root.body else {
            panic!("expected a dictionary");
        };
        let keys: vec::Vec<&str> = dictionary
            .items
            .iter()
            .filter_map(|(k, _)| match &k.body {
                NodeBody::Simple(p) => p.as_str(),
                _ => None,
            })
            .collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(dictionary.items[0].1.declared_type.as_ref().map(|t| t.as_str()), Some("i32"));
    }

    #[test]
    fn multi_arrays_are_row_major() {
        let mut array =
            ArrayValue::new("i32", [Dimension::new(2, 1), Dimension::new(2, -1)]).unwrap();
        array.set(&[2, 0], Value::from(5_i32)).unwrap();
        let value = Value::from(Object::new(array.type_path(), ObjectBody::Array(array)));

        let root = encode(&value).unwrap();
        let NodeBody::MultiArray(multi) = &root.body else {
            panic!("expected a multi array");
        };
        assert_eq!(multi.dimensions, [Dimension::new(2, 1), Dimension::new(2, -1)]);
        let indexes: vec::Vec<&[i32]> = multi.items.iter().map(|(i, _)| i.as_slice()).collect();
        assert_eq!(indexes, [&[1, -1][..], &[1, 0], &[2, -1], &[2, 0]]);
        assert_eq!(multi.items[3].1.body, NodeBody::Simple(Primitive::I32(5)));
    }

    #[test]
    fn single_arrays_keep_lower_bound() {
        let array =
            ArrayValue::from_items("String", 3, [Value::from("x"), Value::Null, Value::from("z")])
                .unwrap();
        let value = Value::from(Object::new("String[]", ObjectBody::Array(array)));
        let root = encode(&value).unwrap();
        let NodeBody::SingleArray(single) = &root.body else {
            panic!("expected a single array");
        };
        assert_eq!(single.lower_bound, 3);
        assert_eq!(single.items.len(), 3);
        assert_eq!(single.items[0].body, NodeBody::Simple(Primitive::from("x")));
        assert!(single.items[1].is_null());
        assert_eq!(single.items[2].body, NodeBody::Simple(Primitive::from("z")));
    }

    #[test]
    fn body_mismatch_is_an_error() {
        let odd = Value::from(Object::new("app::Person", ObjectBody::Sequence(vec![])));
        assert!(matches!(encode(&odd), Err(EncodeError::InvalidOperation { .. })));
    }

    #[test]
    fn borrowed_instances_are_reported() {
        let ann = person("Ann");
        let _guard = ann.borrow_mut();
        assert!(matches!(
            encode(&Value::from(ann.clone())),
            Err(EncodeError::Borrowed { .. })
        ));
    }
}
