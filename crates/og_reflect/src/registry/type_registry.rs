use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use og_utils::hash::{HashMap, HashSet};

use crate::info::{FieldInfo, TypeFlags, TypeInfo, TypePath};
use crate::registry::{TypeMeta, TypeTrait, TypeTraitDefault};
use crate::value::{Object, ObjectBody, PrimitiveKind, Value};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of runtime types.
///
/// This struct is used as the central store for type information.
/// [Registering] a type generates a new [`TypeMeta`] entry, keyed by its
/// [`TypePath`]. Short names (module paths stripped) are indexed too, unless
/// two registered types share one.
///
/// # Example
///
/// ```
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TypeInfo::record("app::Person"));
/// registry.register(TypeInfo::record("app::model::Order"));
/// registry.register(TypeInfo::record("app::legacy::Order"));
///
/// assert!(registry.get("String").is_some());
/// assert_eq!(
///     registry.get_with_short_name("Person").map(|m| m.path().as_str()),
///     Some("app::Person"),
/// );
/// assert!(registry.is_ambiguous("Order"));
/// assert!(registry.get_with_short_name("Order").is_none());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: HashMap<TypePath, TypeMeta>,
    type_name_to_path: HashMap<String, TypePath>,
    ambiguous_names: HashSet<String>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: HashMap::default(),
            type_name_to_path: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `bool` `char`
    /// - `i8 - i128`
    /// - `u8 - u128`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in PrimitiveKind::ALL {
            registry.register(TypeInfo::simple(kind.path()));
        }
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        path: &TypePath,
        type_name_to_path: &mut HashMap<String, TypePath>,
        ambiguous_names: &mut HashSet<String>,
    ) {
        let type_name = path.short_name();

        // Check for duplicate names.
        if !ambiguous_names.contains(&type_name) {
            if type_name_to_path.contains_key(&type_name) {
                type_name_to_path.remove(&type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_path.insert(type_name, path.clone());
            }
        }
    }

    /// Registers a type with the standard traits, see [`TypeMeta::standard`].
    ///
    /// Returns `false` and keeps the existing entry if the path is already registered.
    #[inline]
    pub fn register(&mut self, type_info: TypeInfo) -> bool {
        self.try_insert_type_meta(TypeMeta::standard(type_info))
    }

    /// Try add or do nothing.
    ///
    /// - If the path already exists, the function will do nothing and return `false`.
    /// - If the path does not exist, the function will insert value and return `true`.
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        if self.type_meta_table.contains_key(type_meta.path()) {
            return false;
        }
        Self::add_new_type_indices(
            type_meta.path(),
            &mut self.type_name_to_path,
            &mut self.ambiguous_names,
        );
        self.type_meta_table
            .insert(type_meta.path().clone(), type_meta);
        true
    }

    /// Insert or **Overwrite** a [`TypeMeta`].
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains_key(type_meta.path()) {
            Self::add_new_type_indices(
                type_meta.path(),
                &mut self.type_name_to_path,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table
            .insert(type_meta.path().clone(), type_meta);
    }

    /// Registers `Vec<element>`, an ordered collection, and returns its path.
    pub fn register_list(&mut self, element: impl Into<TypePath>) -> TypePath {
        let element = element.into();
        let path = TypePath::from(format!("Vec<{element}>"));
        self.register(TypeInfo::collection(path.clone()).with_generics([element]));
        path
    }

    /// Registers `Map<key, value>`, a dictionary, and returns its path.
    pub fn register_map(
        &mut self,
        key: impl Into<TypePath>,
        value: impl Into<TypePath>,
    ) -> TypePath {
        let (key, value) = (key.into(), value.into());
        let path = TypePath::from(format!("Map<{key}, {value}>"));
        self.register(TypeInfo::dictionary(path.clone()).with_generics([key, value]));
        path
    }

    /// Inserts a type trait into a registered type, replacing one of the same type.
    ///
    /// Returns `false` if the type is not registered.
    pub fn insert_type_trait<T: TypeTrait>(&mut self, path: &str, data: T) -> bool {
        match self.type_meta_table.get_mut(path) {
            Some(meta) => {
                meta.insert_trait(data);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.type_meta_table.contains_key(path)
    }

    #[inline]
    pub fn get(&self, path: &str) -> Option<&TypeMeta> {
        self.type_meta_table.get(path)
    }

    #[inline]
    pub fn get_mut(&mut self, path: &str) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(path)
    }

    #[inline]
    pub fn get_type_info(&self, path: &str) -> Option<&TypeInfo> {
        self.get(path).map(TypeMeta::type_info)
    }

    /// Returns the meta of the only type with this short name.
    pub fn get_with_short_name(&self, type_name: &str) -> Option<&TypeMeta> {
        self.type_name_to_path
            .get(type_name)
            .and_then(|path| self.get(path.as_str()))
    }

    /// Returns `true` if more than one registered type has this short name.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Iterates over all entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    // -------------------------------------------------------------------------
    // Inheritance

    /// Iterates over the type and its registered base types, derived first.
    ///
    /// The walk stops at the first unregistered base, and after visiting as
    /// many types as are registered, so a cyclic base declaration terminates.
    pub fn base_chain<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a TypeMeta> + use<'a> {
        let mut next = self.get(path);
        let mut remaining = self.len();
        core::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = current.base().and_then(|base| self.get(base.as_str()));
            Some(current)
        })
    }

    /// Returns the flags of the type and all its base types.
    pub fn inherited_flags(&self, path: &str) -> TypeFlags {
        self.base_chain(path)
            .fold(TypeFlags::empty(), |flags, meta| flags | meta.flags())
    }

    /// Returns `true` if the type or a base type is flagged `SIMPLE`.
    #[inline]
    pub fn is_simple(&self, path: &str) -> bool {
        self.inherited_flags(path).contains(TypeFlags::SIMPLE)
    }

    /// Returns the first type trait `T` found along the base chain.
    pub fn get_type_trait<T: TypeTrait>(&self, path: &str) -> Option<&T> {
        self.base_chain(path).find_map(TypeMeta::get_trait::<T>)
    }

    /// Returns every field of the type, base fields first.
    ///
    /// A field redeclared by a derived type keeps the base position and takes
    /// the derived declaration.
    pub fn fields(&self, path: &str) -> Vec<&FieldInfo> {
        let chain: Vec<&TypeMeta> = self.base_chain(path).collect();
        let mut fields: Vec<&FieldInfo> = Vec::new();
        for meta in chain.into_iter().rev() {
            for field in meta.fields() {
                match fields.iter_mut().find(|f| f.name() == field.name()) {
                    Some(slot) => *slot = field,
                    None => fields.push(field),
                }
            }
        }
        fields
    }

    /// Returns the declared field `name` of the type or a base type.
    pub fn field(&self, path: &str, name: &str) -> Option<&FieldInfo> {
        self.base_chain(path).find_map(|meta| meta.type_info().field(name))
    }

    // -------------------------------------------------------------------------
    // Construction

    /// Creates a default value through the type's own [`TypeTraitDefault`].
    pub fn default_value(&self, path: &str) -> Option<Value> {
        self.get(path)?
            .get_trait::<TypeTraitDefault>()
            .map(|generator| generator.default(self))
    }

    /// Creates an empty instance of a registered, non-simple type.
    ///
    /// The body follows the inherited flags: `KEYED` types get an empty map,
    /// other `ITERABLE` types an empty sequence, the rest a record. Required
    /// simple fields are set to their default values, other fields to `Null`.
    pub fn new_instance(&self, path: &str) -> Option<Value> {
        let meta = self.get(path)?;
        let flags = self.inherited_flags(path);
        if flags.contains(TypeFlags::SIMPLE) {
            return None;
        }

        let body = if flags.contains(TypeFlags::KEYED) {
            ObjectBody::Map(Vec::new())
        } else if flags.contains(TypeFlags::ITERABLE) {
            ObjectBody::Sequence(Vec::new())
        } else {
            ObjectBody::Record
        };

        let mut object = Object::new(meta.path().clone(), body);
        for field in self.fields(path) {
            let value = if !field.is_optional() && self.is_simple(field.ty().as_str()) {
                self.default_value(field.ty().as_str()).unwrap_or_default()
            } else {
                Value::Null
            };
            object.set_field(field.name(), value);
        }
        Some(Value::from(object))
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_meta_table.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::info::{FieldInfo, TypeFlags, TypeInfo};
    use crate::registry::{TypeRegistry, TypeTraitAppend, TypeTraitInsert};
    use crate::value::{Primitive, Value};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeInfo::record("app::Person")
                .with_field_of("name", "String")
                .with_field_of("age", "i32")
                .with_field_of("friend", "app::Person"),
        );
        registry.register(
            TypeInfo::record("app::Employee")
                .with_base("app::Person")
                .with_field_of("salary", "f64")
                .with_field(FieldInfo::new("age", "i64").optional()),
        );
        registry
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = registry();
        assert!(!registry.register(TypeInfo::simple("app::Person")));
        assert!(!registry.get("app::Person").unwrap().type_info().is_simple());
    }

    #[test]
    fn fields_are_inherited_base_first() {
        let registry = registry();
        let names: alloc::vec::Vec<&str> = registry
            .fields("app::Employee")
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(names, ["name", "age", "friend", "salary"]);
        assert_eq!(
            registry.field("app::Employee", "age").unwrap().ty().as_str(),
            "i64"
        );
        assert!(registry.field("app::Person", "salary").is_none());
    }

    #[test]
    fn base_chain_survives_cycles() {
        let mut registry = TypeRegistry::empty();
        registry.register(TypeInfo::record("a::A").with_base("a::B"));
        registry.register(TypeInfo::record("a::B").with_base("a::A"));
        assert_eq!(registry.base_chain("a::A").count(), 2);
    }

    #[test]
    fn base_chain_outlives_its_path() {
        let registry = registry();
        let chain = {
            let path = alloc::format!("app::{}", "Employee");
            registry.base_chain(&path)
        };
        let paths: alloc::vec::Vec<&str> = chain.map(|meta| meta.path().as_str()).collect();
        assert_eq!(paths, ["app::Employee", "app::Person"]);
    }

    #[test]
    fn list_and_map_registration() {
        let mut registry = registry();
        let list = registry.register_list("app::Person");
        let map = registry.register_map("String", "i32");

        assert_eq!(list.as_str(), "Vec<app::Person>");
        assert_eq!(map.as_str(), "Map<String, i32>");
        assert!(registry.get_type_trait::<TypeTraitAppend>(list.as_str()).is_some());
        assert!(registry.get_type_trait::<TypeTraitInsert>(map.as_str()).is_some());
        assert!(registry.get_type_trait::<TypeTraitAppend>(map.as_str()).is_none());
        assert_eq!(
            registry.get_with_short_name("Vec<Person>").map(|m| m.path().clone()),
            Some(list)
        );
    }

    #[test]
    fn inherited_capabilities() {
        let mut registry = registry();
        registry.register_list("i32");
        registry.register(TypeInfo::record("app::Scores").with_base("Vec<i32>"));

        assert!(
            registry
                .inherited_flags("app::Scores")
                .contains(TypeFlags::ITERABLE | TypeFlags::ORDERED)
        );
        let scores = registry.default_value("app::Scores").unwrap();
        let scores = scores.as_object().unwrap().borrow();
        assert_eq!(scores.ty().as_str(), "app::Scores");
        assert!(scores.items().is_some());
    }

    #[test]
    fn new_instance_sets_simple_defaults() {
        let mut registry = registry();
        registry.register(TypeInfo::enumeration("app::Color", ["Red", "Green"]));
        registry.register(
            TypeInfo::record("app::Pen")
                .with_field_of("color", "app::Color")
                .with_field(FieldInfo::new("width", "f32").optional()),
        );

        let pen = registry.new_instance("app::Pen").unwrap();
        let pen = pen.as_object().unwrap().borrow();
        assert_eq!(
            pen.field("color").and_then(Value::as_primitive).map(|p| p.to_string()),
            Some("Red".into())
        );
        assert!(pen.field("width").is_some_and(Value::is_null));

        let person = registry.new_instance("app::Person").unwrap();
        let person = person.as_object().unwrap().borrow();
        assert_eq!(
            person.field("age").and_then(Value::as_primitive),
            Some(&Primitive::I32(0))
        );
        assert!(person.field("friend").is_some_and(Value::is_null));
        assert!(registry.new_instance("i32").is_none());
    }
}
