use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use og_utils::hash::HashMap;

use crate::access::{AccessError, ExclusionRules};
use crate::info::{FieldInfo, TypePath};
use crate::registry::TypeRegistry;
use crate::value::{Object, Value};

// -----------------------------------------------------------------------------
// PropertyAccessor

/// Named property access on dynamic instances.
///
/// The encoder walks [`properties`](PropertyAccessor::properties) in order and
/// reads them with [`get`](PropertyAccessor::get); the decoder resolves names
/// with [`property`](PropertyAccessor::property) and writes them with
/// [`set`](PropertyAccessor::set).
pub trait PropertyAccessor {
    /// Returns the serializable properties of `ty`, in declaration order.
    fn properties(&self, ty: &TypePath) -> Arc<[FieldInfo]>;

    /// Returns the serializable property `name` of `ty`.
    fn property(&self, ty: &TypePath, name: &str) -> Option<FieldInfo> {
        self.properties(ty).iter().find(|f| f.name() == name).cloned()
    }

    /// Reads a property, unset slots read as `Null`.
    fn get(&self, instance: &Object, name: &str) -> Result<Value, AccessError>;

    /// Writes a property.
    fn set(&self, instance: &mut Object, name: &str, value: Value) -> Result<(), AccessError>;
}

// -----------------------------------------------------------------------------
// ReflectAccessor

/// A [`PropertyAccessor`] backed by a [`TypeRegistry`].
///
/// Property lists include inherited fields (base first) and are filtered by
/// [`ExclusionRules`]. Each list is computed once per type.
///
/// # Examples
///
/// ```
/// use og_reflect::access::{ExclusionRules, PropertyAccessor, ReflectAccessor};
/// use og_reflect::info::{EXCLUDE_FROM_SERIALIZATION, FieldInfo, TypeInfo};
/// use og_reflect::registry::TypeRegistry;
/// use og_reflect::value::{Object, Value};
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeInfo::record("app::User")
///         .with_field_of("name", "String")
///         .with_field(FieldInfo::new("token", "String").with_attribute(EXCLUDE_FROM_SERIALIZATION)),
/// );
/// let accessor = ReflectAccessor::new(registry.into(), ExclusionRules::new());
///
/// let user_type = "app::User".into();
/// let names: Vec<_> = accessor.properties(&user_type).iter().map(|f| f.name().to_owned()).collect();
/// assert_eq!(names, ["name"]);
///
/// let mut user = Object::record("app::User");
/// accessor.set(&mut user, "name", Value::from("Ann")).unwrap();
/// assert!(accessor.set(&mut user, "name", Value::from(3_i32)).is_err());
/// assert!(accessor.get(&user, "email").is_err());
/// ```
pub struct ReflectAccessor {
    registry: Arc<TypeRegistry>,
    rules: ExclusionRules,
    cache: RwLock<HashMap<TypePath, Arc<[FieldInfo]>>>,
}

impl ReflectAccessor {
    pub fn new(registry: Arc<TypeRegistry>, rules: ExclusionRules) -> Self {
        Self {
            registry,
            rules,
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    #[inline]
    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    fn declared(&self, instance: &Object, name: &str) -> Result<&FieldInfo, AccessError> {
        self.registry
            .field(instance.ty().as_str(), name)
            .ok_or_else(|| AccessError::MissingProperty {
                ty: instance.ty().clone(),
                name: Arc::from(name),
            })
    }

    fn check_kind(&self, owner: &TypePath, field: &FieldInfo, value: &Value) -> Result<(), AccessError> {
        let field_is_simple = self.registry.is_simple(field.ty().as_str());
        let compatible = match value {
            Value::Null => true,
            Value::Simple(primitive) => {
                field_is_simple && primitive.type_path() == *field.ty()
            }
            Value::Object(_) => !field_is_simple,
        };
        if compatible {
            return Ok(());
        }
        Err(AccessError::KindMismatch {
            ty: owner.clone(),
            name: field.name_arc().clone(),
            expected: field.ty().clone(),
            found: value
                .type_path()
                .unwrap_or_else(|| TypePath::new("<borrowed>")),
        })
    }
}

impl PropertyAccessor for ReflectAccessor {
    fn properties(&self, ty: &TypePath) -> Arc<[FieldInfo]> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned();
        if let Some(properties) = cached {
            return properties;
        }

        let properties: Arc<[FieldInfo]> = self
            .registry
            .fields(ty.as_str())
            .into_iter()
            .filter(|field| !self.rules.is_excluded(&self.registry, ty, field))
            .cloned()
            .collect::<Vec<_>>()
            .into();

        // First insertion wins, concurrent callers computed the same list.
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ty.clone())
            .or_insert(properties)
            .clone()
    }

    fn get(&self, instance: &Object, name: &str) -> Result<Value, AccessError> {
        self.declared(instance, name)?;
        Ok(instance.field(name).cloned().unwrap_or_default())
    }

    fn set(&self, instance: &mut Object, name: &str, value: Value) -> Result<(), AccessError> {
        let field = self.declared(instance, name)?;
        self.check_kind(instance.ty(), field, &value)?;
        instance.set_field(name, value);
        Ok(())
    }
}

impl core::fmt::Debug for ReflectAccessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectAccessor")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{PropertyAccessor, ReflectAccessor};
    use crate::access::{AccessError, ExclusionRules};
    use crate::info::{FieldInfo, TypeInfo, TypePath};
    use crate::registry::TypeRegistry;
    use crate::value::{Object, Value};

    fn accessor(rules: ExclusionRules) -> ReflectAccessor {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeInfo::record("app::Person")
                .with_field_of("name", "String")
                .with_field(FieldInfo::new("age", "i32").optional())
                .with_field_of("friend", "app::Person"),
        );
        registry.register(
            TypeInfo::record("app::Employee")
                .with_base("app::Person")
                .with_field_of("salary", "f64"),
        );
        ReflectAccessor::new(Arc::new(registry), rules)
    }

    #[test]
    fn properties_are_cached_and_filtered() {
        let accessor = accessor(ExclusionRules::new().with_ignored_property("app::Person", "age"));
        let employee = TypePath::new("app::Employee");

        let first = accessor.properties(&employee);
        let second = accessor.properties(&employee);
        assert!(Arc::ptr_eq(&first, &second));

        let names: alloc::vec::Vec<&str> = first.iter().map(FieldInfo::name).collect();
        assert_eq!(names, ["name", "friend", "salary"]);
        assert!(accessor.property(&employee, "age").is_none());
        assert!(accessor.property(&employee, "salary").is_some());
    }

    #[test]
    fn set_checks_kinds() {
        let accessor = accessor(ExclusionRules::new());
        let mut ann = Object::record("app::Person");

        accessor.set(&mut ann, "age", Value::from(30_i32)).unwrap();
        accessor.set(&mut ann, "age", Value::Null).unwrap();
        accessor
            .set(&mut ann, "friend", Object::record("app::Person").into())
            .unwrap();

        let err = accessor.set(&mut ann, "age", Value::from(30_i64)).unwrap_err();
        assert!(matches!(err, AccessError::KindMismatch { .. }));
        let err = accessor.set(&mut ann, "friend", Value::from("Bob")).unwrap_err();
        assert!(matches!(err, AccessError::KindMismatch { .. }));
        let err = accessor.set(&mut ann, "nickname", Value::Null).unwrap_err();
        assert!(matches!(err, AccessError::MissingProperty { .. }));
    }

    #[test]
    fn unset_slots_read_as_null() {
        let accessor = accessor(ExclusionRules::new());
        let ann = Object::record("app::Employee");
        assert!(accessor.get(&ann, "salary").unwrap().is_null());
        assert!(accessor.get(&ann, "name").unwrap().is_null());
    }
}
