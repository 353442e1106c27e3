//! The [`Serializer`] facade.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use og_graph::codec::{CodecError, TreeReader, TreeWriter};
use og_graph::{DecodeError, EncodeError, GraphDecoder, GraphEncoder, PropertyNode};
use og_reflect::Value;
use og_reflect::access::ReflectAccessor;
use og_reflect::classify::TypeClassifier;
use og_reflect::registry::TypeRegistry;
use thiserror::Error;

use crate::convert::{DefaultValueConverter, SimpleValueConverter, TypeNameConverter};
use crate::document::Element;
use crate::reader::XmlReader;
use crate::settings::SerializerSettings;
use crate::writer::XmlWriter;

// -----------------------------------------------------------------------------
// Errors

/// An error that occurs while serializing a value graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An error that occurs while deserializing, whatever its cause.
///
/// The failure that stopped decoding is available as [`cause`] and as the
/// error [`source`].
///
/// [`cause`]: DeserializeError::cause
/// [`source`]: core::error::Error::source
#[derive(Debug, Error)]
#[error("cannot deserialize the document")]
pub struct DeserializeError {
    #[source]
    cause: DeserializeCause,
}

impl DeserializeError {
    #[inline]
    pub fn cause(&self) -> &DeserializeCause {
        &self.cause
    }

    #[inline]
    pub fn into_cause(self) -> DeserializeCause {
        self.cause
    }
}

/// The underlying failure of a [`DeserializeError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeCause {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

macro_rules! impl_from_cause {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DeserializeError {
                #[inline]
                fn from(error: $ty) -> Self {
                    Self { cause: DeserializeCause::from(error) }
                }
            }
        )*
    };
}

impl_from_cause!(io::Error, CodecError, DecodeError);

// -----------------------------------------------------------------------------
// Serializer

/// Serializes value graphs to XML and back.
///
/// One serializer can be shared between threads, its entry points run one
/// at a time. Shape and property lookups are cached across calls, identity
/// caches live for one call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use og_reflect::info::TypeInfo;
/// use og_reflect::registry::TypeRegistry;
/// use og_reflect::{Object, ObjectBody, Value};
/// use og_xml::{Serializer, SerializerSettings};
///
/// let mut registry = TypeRegistry::new();
/// let list = registry.register_list("i32");
///
/// let settings = SerializerSettings::default().with_indent(None);
/// let serializer = Serializer::with_settings(Arc::new(registry), settings);
///
/// let value = Value::from(Object::new(
///     list,
///     ObjectBody::Sequence(vec![Value::from(1_i32), Value::Null]),
/// ));
/// let text = serializer.serialize_to_string(&value).unwrap();
/// assert!(text.ends_with(
///     r#"<Collection name="Root" type="Vec&lt;i32&gt;"><Items><Simple value="1"/><Null/></Items></Collection>"#
/// ));
/// ```
pub struct Serializer {
    guard: Mutex<()>,
    classifier: TypeClassifier,
    accessor: ReflectAccessor,
    settings: SerializerSettings,
    types: TypeNameConverter,
    values: Box<dyn SimpleValueConverter>,
}

impl Serializer {
    /// Creates a serializer with default settings.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_settings(registry, SerializerSettings::default())
    }

    pub fn with_settings(registry: Arc<TypeRegistry>, settings: SerializerSettings) -> Self {
        Self {
            guard: Mutex::new(()),
            classifier: TypeClassifier::new(registry.clone()),
            accessor: ReflectAccessor::new(registry.clone(), settings.exclusion_rules()),
            types: TypeNameConverter::new(registry.clone(), settings.type_names),
            values: Box::new(DefaultValueConverter::new(registry)),
            settings,
        }
    }

    /// Replaces the converter of simple values.
    pub fn with_value_converter(mut self, converter: impl SimpleValueConverter + 'static) -> Self {
        self.values = Box::new(converter);
        self
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.classifier.registry()
    }

    #[inline]
    pub fn settings(&self) -> &SerializerSettings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Encodes `value` as a property tree named after the root name.
    pub fn to_tree(&self, value: &Value) -> Result<PropertyNode, SerializeError> {
        let _guard = self.lock();
        self.encode(value)
    }

    pub fn serialize_to_string(&self, value: &Value) -> Result<String, SerializeError> {
        let _guard = self.lock();
        let document = self.write_document(value)?;
        Ok(document.to_xml(self.settings.indent)?)
    }

    pub fn serialize<W: Write>(&self, value: &Value, out: W) -> Result<(), SerializeError> {
        let _guard = self.lock();
        let document = self.write_document(value)?;
        Ok(document.write_to(out, self.settings.indent)?)
    }

    /// Serializes to a file, creating missing parent directories.
    pub fn serialize_to_file(
        &self,
        value: &Value,
        path: impl AsRef<Path>,
    ) -> Result<(), SerializeError> {
        let path = path.as_ref();
        let _guard = self.lock();
        let document = self.write_document(value)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        document.write_to(&mut out, self.settings.indent)?;
        out.flush()?;
        Ok(())
    }

    fn encode(&self, value: &Value) -> Result<PropertyNode, SerializeError> {
        log::debug!("serializing `{}`", self.settings.root_name);
        let tree = GraphEncoder::new(&self.classifier, &self.accessor)
            .encode(&self.settings.root_name, value)?;
        Ok(tree)
    }

    fn write_document(&self, value: &Value) -> Result<Element, SerializeError> {
        let tree = self.encode(value)?;
        let mut writer = XmlWriter::new(&self.types, &*self.values);
        TreeWriter::new(&mut writer).write(&tree)?;
        Ok(writer.into_document()?)
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Decodes a property tree into a value graph.
    pub fn from_tree(&self, tree: &PropertyNode) -> Result<Value, DeserializeError> {
        let _guard = self.lock();
        self.decode(tree)
    }

    pub fn deserialize_str(&self, text: &str) -> Result<Value, DeserializeError> {
        let _guard = self.lock();
        self.read_document(&Element::parse(text)?)
    }

    pub fn deserialize<R: Read>(&self, mut input: R) -> Result<Value, DeserializeError> {
        let _guard = self.lock();
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.read_document(&Element::parse(&text)?)
    }

    pub fn deserialize_from_file(&self, path: impl AsRef<Path>) -> Result<Value, DeserializeError> {
        let _guard = self.lock();
        let mut text = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut text)?;
        self.read_document(&Element::parse(&text)?)
    }

    fn read_document(&self, document: &Element) -> Result<Value, DeserializeError> {
        let mut reader = XmlReader::new(document, &self.types, &*self.values);
        let tree = TreeReader::new(&mut reader, &self.classifier, &self.accessor).read(None)?;
        self.decode(&tree)
    }

    fn decode(&self, tree: &PropertyNode) -> Result<Value, DeserializeError> {
        log::debug!("deserializing `{}`", tree.name);
        let value = GraphDecoder::new(&self.classifier, &self.accessor)
            .with_strict_containers(self.settings.strict_containers)
            .decode(tree, None)?;
        Ok(value)
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("settings", &self.settings)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::error::Error as _;

    use og_graph::DecodeError;
    use og_graph::codec::CodecError;
    use og_reflect::array::{ArrayValue, BoundsError, Dimension};
    use og_reflect::info::{FieldInfo, TypeInfo, TypePath};
    use og_reflect::registry::TypeRegistry;
    use og_reflect::value::{EnumValue, graph_eq};
    use og_reflect::{Object, ObjectBody, ObjectRef, Primitive, Value};

    use super::{DeserializeCause, Serializer};
    use crate::convert::{DefaultValueConverter, SimpleValueConverter, TypeNameStyle};
    use crate::settings::SerializerSettings;

    const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeInfo::record("app::Person")
                .with_field_of("name", "String")
                .with_field_of("friend", "app::Person")
                .with_field(FieldInfo::new("password", "String").optional()),
        );
        registry.register(TypeInfo::record("app::Student").with_base("app::Person"));
        registry.register(TypeInfo::enumeration("app::Color", ["Red", "Green"]));
        registry.register(
            TypeInfo::record("app::Pen")
                .with_field_of("color", "app::Color")
                .with_field_of("sharp", "bool"),
        );
        registry.register_list("app::Person");
        Arc::new(registry)
    }

    fn compact() -> Serializer {
        Serializer::with_settings(registry(), SerializerSettings::default().with_indent(None))
    }

    fn person(name: &str) -> ObjectRef {
        ObjectRef::new(Object::record("app::Person").with_field("name", name))
    }

    fn list(items: Vec<Value>) -> Value {
        Value::from(Object::new("Vec<app::Person>", ObjectBody::Sequence(items)))
    }

    fn field(value: &Value, name: &str) -> Value {
        let object = value.as_object().unwrap().borrow();
        object.field(name).cloned().unwrap_or_default()
    }

    #[test]
    fn mutual_friends() {
        let a = person("A");
        let b = person("B");
        a.borrow_mut().set_field("friend", b.clone().into());
        b.borrow_mut().set_field("friend", a.clone().into());
        let value = Value::from(a);

        let serializer = compact();
        let text = serializer.serialize_to_string(&value).unwrap();
        let expected = [
            DECLARATION,
            r#"<Complex name="Root" type="app::Person" id="1"><Properties>"#,
            r#"<Simple name="name" value="A"/>"#,
            r#"<Complex name="friend"><Properties>"#,
            r#"<Simple name="name" value="B"/>"#,
            r#"<Reference name="friend" id="1"/>"#,
            r#"<Null name="password"/>"#,
            r#"</Properties></Complex>"#,
            r#"<Null name="password"/>"#,
            r#"</Properties></Complex>"#,
        ];
        assert_eq!(text, expected.concat());

        let copy = serializer.deserialize_str(&text).unwrap();
        assert!(graph_eq(&value, &copy));
        let back = field(&field(&copy, "friend"), "friend");
        assert!(back.as_object().unwrap().ptr_eq(copy.as_object().unwrap()));
    }

    #[test]
    fn shared_items_stay_shared() {
        let shared = person("S");
        let value = list(vec![shared.clone().into(), Value::Null, shared.into()]);

        let serializer = Serializer::new(registry());
        let text = serializer.serialize_to_string(&value).unwrap();
        assert!(text.contains(r#"<Complex id="2">"#));
        assert!(text.contains(r#"<Reference id="2"/>"#));

        let copy = serializer.deserialize_str(&text).unwrap();
        assert!(graph_eq(&value, &copy));
        let object = copy.as_object().unwrap().borrow();
        let items = object.items().unwrap();
        assert!(items[1].is_null());
        assert!(items[0].as_object().unwrap().ptr_eq(items[2].as_object().unwrap()));
    }

    #[test]
    fn null_root() {
        let serializer = compact();
        let text = serializer.serialize_to_string(&Value::Null).unwrap();
        assert_eq!(text, [DECLARATION, r#"<Null name="Root"/>"#].concat());
        assert!(serializer.deserialize_str(&text).unwrap().is_null());
    }

    #[test]
    fn null_string_fields_round_trip() {
        let nameless = Value::from(ObjectRef::new(
            Object::record("app::Person").with_field("name", Value::Null),
        ));
        let serializer = compact();
        let text = serializer.serialize_to_string(&nameless).unwrap();
        assert!(text.contains(r#"<Null name="name"/>"#));

        let copy = serializer.deserialize_str(&text).unwrap();
        assert!(graph_eq(&nameless, &copy));
        assert!(field(&copy, "name").is_null());
    }

    #[test]
    fn multi_arrays_keep_bounds() {
        let mut grid =
            ArrayValue::new("i32", [Dimension::new(2, 1), Dimension::new(3, -1)]).unwrap();
        grid.set(&[1, -1], Value::from(5_i32)).unwrap();
        grid.set(&[2, 1], Value::from(6_i32)).unwrap();
        let value = Value::from(Object::new(grid.type_path(), ObjectBody::Array(grid)));

        let serializer = compact();
        let text = serializer.serialize_to_string(&value).unwrap();
        assert!(text.contains(r#"<Dimension length="2" lowerBound="1"/>"#));
        assert!(text.contains(r#"<Dimension length="3" lowerBound="-1"/>"#));
        assert!(text.contains(r#"<Item indexes="2,1"><Simple value="6"/></Item>"#));

        let copy = serializer.deserialize_str(&text).unwrap();
        assert!(graph_eq(&value, &copy));
        let object = copy.as_object().unwrap().borrow();
        let array = object.array().unwrap();
        assert_eq!(array.dimensions(), &[Dimension::new(2, 1), Dimension::new(3, -1)]);
        assert!(array.get(&[1, 0]).unwrap().is_null());
    }

    #[test]
    fn ignored_properties_are_not_written() {
        let settings = SerializerSettings::default().ignore_property("app::Person", "password");
        let serializer = Serializer::with_settings(registry(), settings);

        let student = ObjectRef::new(
            Object::record("app::Student")
                .with_field("name", "S")
                .with_field("password", "secret"),
        );
        let text = serializer.serialize_to_string(&student.into()).unwrap();
        assert!(!text.contains("password"));
        assert!(!text.contains("secret"));

        let copy = serializer.deserialize_str(&text).unwrap();
        assert_eq!(field(&copy, "name").as_primitive(), Some(&Primitive::from("S")));
        assert!(field(&copy, "password").is_null());
    }

    #[test]
    fn short_type_names() {
        let settings = SerializerSettings::default().with_type_names(TypeNameStyle::Short);
        let serializer = Serializer::with_settings(registry(), settings);

        let student = ObjectRef::new(Object::record("app::Student").with_field("name", "S"));
        let value = list(vec![person("P").into(), student.into()]);
        let text = serializer.serialize_to_string(&value).unwrap();
        assert!(text.contains(r#"type="Vec&lt;Person&gt;""#));
        assert!(text.contains(r#"<Complex type="Student">"#));
        assert!(!text.contains("app::"));

        let copy = serializer.deserialize_str(&text).unwrap();
        assert!(graph_eq(&value, &copy));
        // Full names still read.
        let full = Serializer::new(registry()).serialize_to_string(&value).unwrap();
        assert!(graph_eq(&value, &serializer.deserialize_str(&full).unwrap()));
    }

    #[test]
    fn enums_and_custom_converters() {
        struct YesNo(DefaultValueConverter);

        impl SimpleValueConverter for YesNo {
            fn to_text(&self, value: &Primitive) -> String {
                match value {
                    Primitive::Bool(true) => "yes".to_string(),
                    Primitive::Bool(false) => "no".to_string(),
                    other => self.0.to_text(other),
                }
            }

            fn from_text(&self, text: &str, ty: &TypePath) -> Result<Primitive, CodecError> {
                match (ty.as_str(), text) {
                    ("bool", "yes") => Ok(Primitive::Bool(true)),
                    ("bool", "no") => Ok(Primitive::Bool(false)),
                    _ => self.0.from_text(text, ty),
                }
            }
        }

        let pen = Value::from(
            Object::record("app::Pen")
                .with_field("color", Primitive::Enum(EnumValue::new("app::Color", "Green")))
                .with_field("sharp", true),
        );
        let serializer =
            compact().with_value_converter(YesNo(DefaultValueConverter::new(registry())));
        let text = serializer.serialize_to_string(&pen).unwrap();
        assert!(text.contains(r#"<Simple name="color" value="Green"/>"#));
        assert!(text.contains(r#"<Simple name="sharp" value="yes"/>"#));
        assert!(graph_eq(&pen, &serializer.deserialize_str(&text).unwrap()));

        let broken = text.replace("Green", "Blue");
        let cause = serializer.deserialize_str(&broken).unwrap_err().into_cause();
        assert!(matches!(
            cause,
            DeserializeCause::Codec(CodecError::ValueConversion { .. })
        ));
    }

    #[test]
    fn streams_and_files() {
        let a = person("A");
        a.borrow_mut().set_field("friend", a.clone().into());
        let value = Value::from(a);
        let serializer = Serializer::new(registry());

        let mut buffer = Vec::new();
        serializer.serialize(&value, &mut buffer).unwrap();
        let copy = serializer.deserialize(buffer.as_slice()).unwrap();
        assert!(graph_eq(&value, &copy));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("graph.xml");
        serializer.serialize_to_file(&value, &path).unwrap();
        assert!(path.exists());
        let copy = serializer.deserialize_from_file(&path).unwrap();
        assert!(graph_eq(&value, &copy));

        let missing = dir.path().join("missing.xml");
        let error = serializer.deserialize_from_file(missing).unwrap_err();
        assert!(matches!(error.cause(), DeserializeCause::Io(_)));
    }

    #[test]
    fn trees_round_trip() {
        let value = list(vec![person("A").into()]);
        let serializer = Serializer::new(registry());
        let tree = serializer.to_tree(&value).unwrap();
        assert_eq!(&*tree.name, "Root");
        assert!(graph_eq(&value, &serializer.from_tree(&tree).unwrap()));
    }

    #[test]
    fn every_failure_is_wrapped() {
        let serializer = Serializer::new(registry());
        let fail = |text: &str| serializer.deserialize_str(text).unwrap_err();

        let error = fail("<Complex");
        assert!(matches!(error.cause(), DeserializeCause::Codec(CodecError::Format(_))));
        assert!(error.source().is_some());

        assert!(matches!(
            fail(r#"<Widget name="Root"/>"#).cause(),
            DeserializeCause::Codec(CodecError::UnknownNodeKind { .. })
        ));
        assert!(matches!(
            fail(r#"<Reference name="Root" id="7"/>"#).cause(),
            DeserializeCause::Codec(CodecError::UnresolvedReference { id: 7 })
        ));
        assert!(matches!(
            fail(r#"<Complex name="Root"/>"#).cause(),
            DeserializeCause::Codec(CodecError::MissingType { .. })
        ));
        assert!(matches!(
            fail(r#"<Complex name="Root" type="app::Unknown"/>"#).cause(),
            DeserializeCause::Decode(DecodeError::InstanceCreation { .. })
        ));

        let grid = |length: &str, rank: usize| {
            let dimension = format!(r#"<Dimension length="{length}"/>"#);
            format!(
                r#"<MultiArray name="Root" type="i32[{}]"><Dimensions>{}</Dimensions><Items/></MultiArray>"#,
                ",".repeat(rank - 1),
                dimension.repeat(rank),
            )
        };
        assert!(matches!(
            fail(&grid("4294967296", 2)).cause(),
            DeserializeCause::Codec(CodecError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            fail(&grid("2147483648", 3)).cause(),
            DeserializeCause::Decode(DecodeError::Bounds(BoundsError::TooLarge { .. }))
        ));
        assert!(matches!(
            fail(r#"<SingleArray name="Root" type="i32[]" lowerBound="2147483647"><Items><Simple value="1"/><Simple value="2"/></Items></SingleArray>"#).cause(),
            DeserializeCause::Decode(DecodeError::Bounds(BoundsError::BoundOverflow { .. }))
        ));
    }
}
