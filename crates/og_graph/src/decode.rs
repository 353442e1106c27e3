//! Rebuild a value graph from a [`PropertyNode`] tree.

use alloc::sync::Arc;

use og_reflect::access::{AccessError, PropertyAccessor};
use og_reflect::array::{ArrayValue, Dimension};
use og_reflect::classify::{ShapeInfo, TypeClassifier};
use og_reflect::info::TypePath;
use og_reflect::{Object, ObjectBody, ObjectRef, Value};
use og_utils::hash::HashMap;

use crate::error::DecodeError;
use crate::tree::{
    CollectionNode, DictionaryNode, MultiArrayNode, NodeBody, PropertyNode, ReferenceInfo,
    SingleArrayNode,
};

// -----------------------------------------------------------------------------
// GraphDecoder

/// Walks a property tree depth first and rebuilds the value graph.
///
/// Instances are created through the construction trait of their type and
/// cached under their reference id before their children are decoded, so
/// placeholders met later, cycles included, resolve to the same instance.
/// A null property is stored as `Null` unless the accessor refuses it with
/// [`AccessError::KindMismatch`], in which case it is skipped.
///
/// Containers whose type has no append or insert trait drop their items
/// with a warning, or fail with [`DecodeError::UnsupportedContainer`] once
/// [`with_strict_containers`](GraphDecoder::with_strict_containers) is set.
///
/// # Examples
///
/// ```
/// use og_graph::decode::GraphDecoder;
/// use og_graph::encode::GraphEncoder;
/// use og_reflect::access::{ExclusionRules, ReflectAccessor};
/// use og_reflect::classify::TypeClassifier;
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::TypeRegistry;
/// use og_reflect::value::{Object, ObjectRef, Value, graph_eq};
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
/// let ann = ObjectRef::new(Object::record("app::Person").with_field("name", "Ann"));
/// ann.borrow_mut().set_field("friend", ann.clone().into());
/// let ann = Value::from(ann);
///
/// let tree = GraphEncoder::new(&classifier, &accessor).encode("Root", &ann).unwrap();
/// let copy = GraphDecoder::new(&classifier, &accessor).decode(&tree, None).unwrap();
///
/// assert!(graph_eq(&ann, &copy));
/// let copy = copy.as_object().unwrap();
/// let friend = copy.borrow().field("friend").and_then(Value::as_object).cloned().unwrap();
/// assert!(friend.ptr_eq(copy));
/// ```
pub struct GraphDecoder<'a, A: PropertyAccessor + ?Sized> {
    classifier: &'a TypeClassifier,
    accessor: &'a A,
    strict_containers: bool,
    instances: HashMap<u32, ObjectRef>,
}

impl<'a, A: PropertyAccessor + ?Sized> GraphDecoder<'a, A> {
    pub fn new(classifier: &'a TypeClassifier, accessor: &'a A) -> Self {
        Self {
            classifier,
            accessor,
            strict_containers: false,
            instances: HashMap::default(),
        }
    }

    /// Fail on container items that cannot be added instead of dropping them.
    #[inline]
    pub fn with_strict_containers(mut self, strict: bool) -> Self {
        self.strict_containers = strict;
        self
    }

    /// Decodes `node`, `expected` is used when the node names no type.
    pub fn decode(
        mut self,
        node: &PropertyNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        let value = self.decode_node(node, expected)?;
        log::trace!("decoded `{}` with {} instances", node.name, self.instances.len());
        Ok(value)
    }

    fn decode_node(
        &mut self,
        node: &PropertyNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        match &node.body {
            NodeBody::Null => Ok(Value::Null),
            NodeBody::Simple(value) => {
                resolve_type(node, expected)?;
                Ok(Value::Simple(value.clone()))
            }
            NodeBody::Reference(reference) => self.cached(reference.reference.id),
            NodeBody::Complex(complex) => {
                if let Some(found) = self.placeholder(complex.reference)? {
                    return Ok(found);
                }
                let ty = resolve_type(node, expected)?;
                let (object, _) = self.construct(&ty)?;
                self.register(complex.reference, &object);
                self.decode_properties(&object, &ty, &complex.properties)?;
                Ok(object.into())
            }
            NodeBody::Collection(collection) => self.decode_collection(node, collection, expected),
            NodeBody::Dictionary(dictionary) => self.decode_dictionary(node, dictionary, expected),
            NodeBody::SingleArray(array) => self.decode_single_array(node, array, expected),
            NodeBody::MultiArray(array) => self.decode_multi_array(node, array, expected),
        }
    }

    // -------------------------------------------------------------------------
    // Identity

    fn cached(&self, id: u32) -> Result<Value, DecodeError> {
        self.instances
            .get(&id)
            .map(|object| Value::from(object.clone()))
            .ok_or(DecodeError::UnresolvedReference { id })
    }

    /// Resolves nodes marked as not processed to the cached instance.
    fn placeholder(&self, reference: Option<ReferenceInfo>) -> Result<Option<Value>, DecodeError> {
        match reference {
            Some(info) if !info.processed => self.cached(info.id).map(Some),
            _ => Ok(None),
        }
    }

    /// Caches a new instance, before its children are decoded.
    fn register(&mut self, reference: Option<ReferenceInfo>, object: &ObjectRef) {
        if let Some(info) = reference {
            log::trace!("#{} is an instance of `{}`", info.id, object.ty());
            self.instances.insert(info.id, object.clone());
        }
    }

    fn construct(&self, ty: &TypePath) -> Result<(ObjectRef, Arc<ShapeInfo>), DecodeError> {
        let shape = self.classifier.classify(ty);
        let value = shape
            .construct()
            .map(|construct| construct.default(self.classifier.registry()));
        match value {
            Some(Value::Object(object)) => Ok((object, shape)),
            _ => Err(DecodeError::InstanceCreation { ty: ty.clone() }),
        }
    }

    // -------------------------------------------------------------------------
    // Children

    fn decode_properties(
        &mut self,
        object: &ObjectRef,
        ty: &TypePath,
        properties: &[PropertyNode],
    ) -> Result<(), DecodeError> {
        for child in properties {
            let Some(field) = self.accessor.property(ty, &child.name) else {
                log::trace!("`{ty}` has no property `{}`, skipped", child.name);
                continue;
            };
            let value = self.decode_node(child, Some(field.ty()))?;
            let is_null = value.is_null();
            match self.accessor.set(&mut object.borrow_mut(), field.name(), value) {
                Err(AccessError::KindMismatch { .. }) if is_null => {
                    log::trace!("`{ty}.{}` does not take null, skipped", child.name);
                }
                result => result?,
            }
        }
        Ok(())
    }

    fn unsupported(&self, ty: &TypePath, count: usize) -> Result<(), DecodeError> {
        if self.strict_containers {
            return Err(DecodeError::UnsupportedContainer { ty: ty.clone() });
        }
        log::warn!("`{ty}` cannot receive items, {count} dropped");
        Ok(())
    }

    fn decode_collection(
        &mut self,
        node: &PropertyNode,
        collection: &CollectionNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        if let Some(found) = self.placeholder(collection.reference)? {
            return Ok(found);
        }
        let ty = resolve_type(node, expected)?;
        let (object, shape) = self.construct(&ty)?;
        self.register(collection.reference, &object);
        self.decode_properties(&object, &ty, &collection.properties)?;

        if collection.items.is_empty() {
            return Ok(object.into());
        }
        let Some(append) = shape.append() else {
            self.unsupported(&ty, collection.items.len())?;
            return Ok(object.into());
        };
        let element = collection.element_type.as_ref().or(shape.element_type());
        for item in &collection.items {
            let value = self.decode_node(item, element)?;
            append.append(&mut object.borrow_mut(), value)?;
        }
        Ok(object.into())
    }

    fn decode_dictionary(
        &mut self,
        node: &PropertyNode,
        dictionary: &DictionaryNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        if let Some(found) = self.placeholder(dictionary.reference)? {
            return Ok(found);
        }
        let ty = resolve_type(node, expected)?;
        let (object, shape) = self.construct(&ty)?;
        self.register(dictionary.reference, &object);
        self.decode_properties(&object, &ty, &dictionary.properties)?;

        if dictionary.items.is_empty() {
            return Ok(object.into());
        }
        let Some(insert) = shape.insert() else {
            self.unsupported(&ty, dictionary.items.len())?;
            return Ok(object.into());
        };
        let key_type = dictionary.key_type.as_ref().or(shape.key_type());
        let value_type = dictionary.value_type.as_ref().or(shape.value_type());
        for (key, value) in &dictionary.items {
            let key = self.decode_node(key, key_type)?;
            let value = self.decode_node(value, value_type)?;
            insert.insert(&mut object.borrow_mut(), key, value)?;
        }
        Ok(object.into())
    }

    // -------------------------------------------------------------------------
    // Arrays

    fn array_element(
        &self,
        node: &PropertyNode,
        element_type: Option<&TypePath>,
        ty: &TypePath,
    ) -> Result<TypePath, DecodeError> {
        element_type
            .or(self.classifier.classify(ty).element_type())
            .cloned()
            .ok_or_else(|| DecodeError::UnknownNodeKind {
                kind: node.kind(),
                ty: ty.clone(),
            })
    }

    fn decode_single_array(
        &mut self,
        node: &PropertyNode,
        array: &SingleArrayNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        if let Some(found) = self.placeholder(array.reference)? {
            return Ok(found);
        }
        let ty = resolve_type(node, expected)?;
        let element = self.array_element(node, array.element_type.as_ref(), &ty)?;
        let dimension = Dimension::new(array.items.len(), array.lower_bound);
        let object = new_array(&ty, ArrayValue::new(element.clone(), [dimension])?);
        self.register(array.reference, &object);

        for (index, item) in dimension.indices().zip(&array.items) {
            if item.is_null() {
                continue;
            }
            let value = self.decode_node(item, Some(&element))?;
            set_element(&object, &[index], value)?;
        }
        Ok(object.into())
    }

    fn decode_multi_array(
        &mut self,
        node: &PropertyNode,
        array: &MultiArrayNode,
        expected: Option<&TypePath>,
    ) -> Result<Value, DecodeError> {
        if let Some(found) = self.placeholder(array.reference)? {
            return Ok(found);
        }
        let ty = resolve_type(node, expected)?;
        let element = self.array_element(node, array.element_type.as_ref(), &ty)?;
        let object = new_array(
            &ty,
            ArrayValue::new(element.clone(), array.dimensions.iter().copied())?,
        );
        self.register(array.reference, &object);

        for (indexes, item) in &array.items {
            if item.is_null() {
                continue;
            }
            let value = self.decode_node(item, Some(&element))?;
            set_element(&object, indexes, value)?;
        }
        Ok(object.into())
    }
}

impl<A: PropertyAccessor + ?Sized> core::fmt::Debug for GraphDecoder<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GraphDecoder")
            .field("strict_containers", &self.strict_containers)
            .field("instances", &self.instances.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The node's runtime type, else the expected type, else the declared type.
fn resolve_type(node: &PropertyNode, expected: Option<&TypePath>) -> Result<TypePath, DecodeError> {
    node.value_type
        .as_ref()
        .or(expected)
        .or(node.declared_type.as_ref())
        .cloned()
        .ok_or_else(|| DecodeError::TypeResolution {
            name: node.name.clone(),
        })
}

fn new_array(ty: &TypePath, array: ArrayValue) -> ObjectRef {
    ObjectRef::new(Object::new(ty.clone(), ObjectBody::Array(array)))
}

fn set_element(object: &ObjectRef, indexes: &[i32], value: Value) -> Result<(), DecodeError> {
    if let Some(array) = object.borrow_mut().array_mut() {
        array.set(indexes, value)?;
    }
    Ok(())
}
