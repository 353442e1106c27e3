//! Text forms of type names and simple values.
//!
//! - [`TypeNameConverter`]: type paths to `type` attribute text and back.
//! - [`SimpleValueConverter`]: simple values to `value` attribute text and
//!   back, with [`DefaultValueConverter`] for built-in kinds and enums.

use alloc::string::{String, ToString};
use alloc::sync::Arc;

use og_graph::codec::CodecError;
use og_reflect::info::TypePath;
use og_reflect::registry::TypeRegistry;
use og_reflect::value::{EnumValue, Primitive, PrimitiveKind};
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// TypeNameConverter

/// How type names are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeNameStyle {
    /// The complete type path, `app::model::Person`.
    #[default]
    Full,
    /// The path without modules, `Person`, where the registry resolves it
    /// back to the same type. Other types keep their full path.
    Short,
}

/// Converts between type paths and their written names.
///
/// Reading accepts both styles: a name is looked up as a registered path
/// first, then as a short name. Unknown names are kept as written.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use og_reflect::info::{TypeInfo, TypePath};
/// use og_reflect::registry::TypeRegistry;
/// use og_xml::convert::{TypeNameConverter, TypeNameStyle};
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TypeInfo::record("app::Person"));
/// let converter = TypeNameConverter::new(Arc::new(registry), TypeNameStyle::Short);
///
/// let grid = TypePath::new("app::Person[,]");
/// assert_eq!(converter.type_to_name(&grid), "Person[,]");
/// assert_eq!(converter.name_to_type("Person[,]"), grid);
/// assert_eq!(converter.name_to_type("app::Person"), TypePath::new("app::Person"));
/// ```
#[derive(Clone)]
pub struct TypeNameConverter {
    registry: Arc<TypeRegistry>,
    style: TypeNameStyle,
}

impl TypeNameConverter {
    #[inline]
    pub fn new(registry: Arc<TypeRegistry>, style: TypeNameStyle) -> Self {
        Self { registry, style }
    }

    #[inline]
    pub fn style(&self) -> TypeNameStyle {
        self.style
    }

    pub fn type_to_name(&self, ty: &TypePath) -> String {
        match self.style {
            TypeNameStyle::Full => ty.as_str().to_string(),
            TypeNameStyle::Short => self.short_name(ty),
        }
    }

    fn short_name(&self, ty: &TypePath) -> String {
        if let Some((element, rank)) = ty.array_element() {
            let element = TypePath::from(self.short_name(&element));
            return TypePath::array_of(&element, rank).as_str().to_string();
        }
        let short = ty.short_name();
        match self.registry.get_with_short_name(&short) {
            Some(meta) if meta.path() == ty => short,
            _ => ty.as_str().to_string(),
        }
    }

    pub fn name_to_type(&self, name: &str) -> TypePath {
        if self.registry.contains(name) {
            return TypePath::new(name);
        }
        let path = TypePath::new(name);
        if let Some((element, rank)) = path.array_element() {
            return TypePath::array_of(&self.name_to_type(element.as_str()), rank);
        }
        match self.registry.get_with_short_name(name) {
            Some(meta) => meta.path().clone(),
            None => path,
        }
    }
}

impl core::fmt::Debug for TypeNameConverter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeNameConverter")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// SimpleValueConverter

/// Converts simple values to attribute text and back.
///
/// Implement this to support simple types the default converter does not
/// know, see [`Serializer::with_value_converter`].
///
/// [`Serializer::with_value_converter`]: crate::Serializer::with_value_converter
pub trait SimpleValueConverter: Send + Sync {
    fn to_text(&self, value: &Primitive) -> String;

    /// Parses `text` as a value of `ty`.
    fn from_text(&self, text: &str, ty: &TypePath) -> Result<Primitive, CodecError>;
}

/// Culture-invariant text for built-in kinds, variant names for enums.
///
/// - booleans read case-insensitively.
/// - numbers are trimmed before parsing; floats use the shortest text that
///   reads back to the same value, `inf` and `NaN` included.
/// - a `char` must be exactly one character.
/// - enum variants resolve through the registry.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use og_reflect::Primitive;
/// use og_reflect::registry::TypeRegistry;
/// use og_xml::convert::{DefaultValueConverter, SimpleValueConverter};
///
/// let converter = DefaultValueConverter::new(Arc::new(TypeRegistry::new()));
/// assert_eq!(converter.to_text(&Primitive::F64(0.1)), "0.1");
/// assert_eq!(converter.from_text(" 42 ", &"u8".into()), Ok(Primitive::U8(42)));
/// assert!(converter.from_text("300", &"u8".into()).is_err());
/// ```
#[derive(Clone)]
pub struct DefaultValueConverter {
    registry: Arc<TypeRegistry>,
}

impl DefaultValueConverter {
    #[inline]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl SimpleValueConverter for DefaultValueConverter {
    #[inline]
    fn to_text(&self, value: &Primitive) -> String {
        value.to_string()
    }

    fn from_text(&self, text: &str, ty: &TypePath) -> Result<Primitive, CodecError> {
        let parsed = match PrimitiveKind::from_path(ty.as_str()) {
            Some(kind) => parse_kind(kind, text),
            None => self
                .registry
                .get_type_info(ty.as_str())
                .filter(|info| info.is_enum())
                .and_then(|info| info.variant(text.trim()))
                .map(|variant| {
                    Primitive::Enum(EnumValue {
                        ty: ty.clone(),
                        variant: variant.clone(),
                    })
                }),
        };
        parsed.ok_or_else(|| CodecError::ValueConversion {
            ty: ty.clone(),
            text: text.to_string(),
        })
    }
}

fn parse_kind(kind: PrimitiveKind, text: &str) -> Option<Primitive> {
    let number = text.trim();
    Some(match kind {
        PrimitiveKind::Bool if number.eq_ignore_ascii_case("true") => Primitive::Bool(true),
        PrimitiveKind::Bool if number.eq_ignore_ascii_case("false") => Primitive::Bool(false),
        PrimitiveKind::Bool => return None,
        PrimitiveKind::Char => {
            let mut chars = text.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Primitive::Char(c)
        }
        PrimitiveKind::I8 => Primitive::I8(number.parse().ok()?),
        PrimitiveKind::I16 => Primitive::I16(number.parse().ok()?),
        PrimitiveKind::I32 => Primitive::I32(number.parse().ok()?),
        PrimitiveKind::I64 => Primitive::I64(number.parse().ok()?),
        PrimitiveKind::I128 => Primitive::I128(number.parse().ok()?),
        PrimitiveKind::U8 => Primitive::U8(number.parse().ok()?),
        PrimitiveKind::U16 => Primitive::U16(number.parse().ok()?),
        PrimitiveKind::U32 => Primitive::U32(number.parse().ok()?),
        PrimitiveKind::U64 => Primitive::U64(number.parse().ok()?),
        PrimitiveKind::U128 => Primitive::U128(number.parse().ok()?),
        PrimitiveKind::F32 => Primitive::F32(number.parse().ok()?),
        PrimitiveKind::F64 => Primitive::F64(number.parse().ok()?),
        PrimitiveKind::String => Primitive::String(Arc::from(text)),
    })
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use og_graph::codec::CodecError;
    use og_reflect::Primitive;
    use og_reflect::info::{TypeInfo, TypePath};
    use og_reflect::registry::TypeRegistry;
    use og_reflect::value::{EnumValue, PrimitiveKind};

    use super::*;

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register(TypeInfo::enumeration("app::Color", ["Red", "Green"]));
        registry.register(TypeInfo::record("app::Person"));
        registry.register(TypeInfo::record("app::model::Order"));
        registry.register(TypeInfo::record("app::legacy::Order"));
        registry.register(TypeInfo::simple("app::Money"));
        registry.register_list("app::Person");
        Arc::new(registry)
    }

    #[test]
    fn built_in_kinds_read_back() {
        let converter = DefaultValueConverter::new(registry());
        for kind in PrimitiveKind::ALL {
            let value = kind.default_value();
            let text = converter.to_text(&value);
            assert_eq!(converter.from_text(&text, &kind.path().into()), Ok(value));
        }

        let read = |text: &str, ty: &str| converter.from_text(text, &ty.into());
        assert_eq!(read("TRUE", "bool"), Ok(Primitive::Bool(true)));
        assert_eq!(read("-12", "i64"), Ok(Primitive::I64(-12)));
        assert_eq!(read(" a b ", "String"), Ok(Primitive::from(" a b ")));
        assert_eq!(read("é", "char"), Ok(Primitive::Char('é')));
        assert!(matches!(read("NaN", "f64"), Ok(Primitive::F64(v)) if v.is_nan()));
        assert_eq!(
            read(&converter.to_text(&Primitive::F32(f32::MAX)), "f32"),
            Ok(Primitive::F32(f32::MAX))
        );
    }

    #[test]
    fn invalid_text() {
        let converter = DefaultValueConverter::new(registry());
        let read = |text: &str, ty: &str| converter.from_text(text, &ty.into());
        assert_eq!(
            read("yes", "bool"),
            Err(CodecError::ValueConversion {
                ty: TypePath::new("bool"),
                text: "yes".into(),
            })
        );
        assert!(read("ab", "char").is_err());
        assert!(read("", "char").is_err());
        assert!(read("-1", "u32").is_err());
        assert!(read("1.5", "i32").is_err());
        assert!(read("100", "app::Money").is_err());
    }

    #[test]
    fn enums_use_variant_names() {
        let converter = DefaultValueConverter::new(registry());
        let green = Primitive::Enum(EnumValue::new("app::Color", "Green"));
        assert_eq!(converter.to_text(&green), "Green");
        assert_eq!(converter.from_text("Green", &"app::Color".into()), Ok(green));
        assert!(converter.from_text("Blue", &"app::Color".into()).is_err());
    }

    #[test]
    fn type_names() {
        let full = TypeNameConverter::new(registry(), TypeNameStyle::Full);
        let short = TypeNameConverter::new(registry(), TypeNameStyle::Short);
        let name = |c: &TypeNameConverter, ty: &str| c.type_to_name(&ty.into());

        assert_eq!(name(&full, "app::Person"), "app::Person");
        assert_eq!(name(&short, "app::Person"), "Person");
        assert_eq!(name(&short, "Vec<app::Person>"), "Vec<Person>");
        assert_eq!(name(&short, "app::model::Order"), "app::model::Order");
        assert_eq!(name(&short, "app::Unknown"), "app::Unknown");
        assert_eq!(name(&short, "i32[]"), "i32[]");

        for ty in ["app::Person", "Vec<app::Person>", "app::legacy::Order", "app::Person[][,]"] {
            let ty = TypePath::new(ty);
            assert_eq!(short.name_to_type(&short.type_to_name(&ty)), ty);
            assert_eq!(full.name_to_type(&short.type_to_name(&ty)), ty);
        }
        assert_eq!(full.name_to_type("Order"), TypePath::new("Order"));
    }
}
