use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::info::TypePath;

// -----------------------------------------------------------------------------
// PrimitiveKind

macro_rules! impl_primitive_kind {
    ($($kind:ident => $path:literal),* $(,)?) => {
        /// The built-in simple types.
        ///
        /// Enums are simple too, but carry their own type path, see [`EnumValue`].
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum PrimitiveKind {
            $($kind,)*
        }

        impl PrimitiveKind {
            /// Every built-in kind, in declaration order.
            pub const ALL: &'static [PrimitiveKind] = &[$(PrimitiveKind::$kind,)*];

            /// Returns the type path registered for this kind.
            #[inline]
            pub const fn path(self) -> &'static str {
                match self {
                    $(PrimitiveKind::$kind => $path,)*
                }
            }

            /// Resolves a built-in kind from its type path.
            pub fn from_path(path: &str) -> Option<Self> {
                match path {
                    $($path => Some(PrimitiveKind::$kind),)*
                    _ => None,
                }
            }
        }
    };
}

impl_primitive_kind! {
    Bool => "bool",
    Char => "char",
    I8 => "i8",
    I16 => "i16",
    I32 => "i32",
    I64 => "i64",
    I128 => "i128",
    U8 => "u8",
    U16 => "u16",
    U32 => "u32",
    U64 => "u64",
    U128 => "u128",
    F32 => "f32",
    F64 => "f64",
    String => "String",
}

impl PrimitiveKind {
    /// Returns the zero value of this kind.
    pub fn default_value(self) -> Primitive {
        match self {
            PrimitiveKind::Bool => Primitive::Bool(false),
            PrimitiveKind::Char => Primitive::Char('\0'),
            PrimitiveKind::I8 => Primitive::I8(0),
            PrimitiveKind::I16 => Primitive::I16(0),
            PrimitiveKind::I32 => Primitive::I32(0),
            PrimitiveKind::I64 => Primitive::I64(0),
            PrimitiveKind::I128 => Primitive::I128(0),
            PrimitiveKind::U8 => Primitive::U8(0),
            PrimitiveKind::U16 => Primitive::U16(0),
            PrimitiveKind::U32 => Primitive::U32(0),
            PrimitiveKind::U64 => Primitive::U64(0),
            PrimitiveKind::U128 => Primitive::U128(0),
            PrimitiveKind::F32 => Primitive::F32(0.0),
            PrimitiveKind::F64 => Primitive::F64(0.0),
            PrimitiveKind::String => Primitive::String(Arc::from("")),
        }
    }
}

// -----------------------------------------------------------------------------
// EnumValue

/// A variant of a registered enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty: TypePath,
    pub variant: Arc<str>,
}

impl EnumValue {
    #[inline]
    pub fn new(ty: impl Into<TypePath>, variant: &str) -> Self {
        Self {
            ty: ty.into(),
            variant: Arc::from(variant),
        }
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A simple leaf value.
///
/// # Examples
///
/// ```
/// use og_reflect::value::{Primitive, PrimitiveKind};
///
/// let value = Primitive::from(42_i32);
/// assert_eq!(value.kind(), Some(PrimitiveKind::I32));
/// assert_eq!(value.type_path().as_str(), "i32");
///
/// let text = Primitive::from("Ann");
/// assert_eq!(text.as_str(), Some("Ann"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(f32),
    F64(f64),
    String(Arc<str>),
    Enum(EnumValue),
}

impl Primitive {
    /// Returns the built-in kind, `None` for enums.
    #[inline]
    pub fn kind(&self) -> Option<PrimitiveKind> {
        self.kind_or_enum().ok()
    }

    /// Returns the built-in kind, or the enum value.
    pub fn kind_or_enum(&self) -> Result<PrimitiveKind, &EnumValue> {
        Ok(match self {
            Primitive::Bool(_) => PrimitiveKind::Bool,
            Primitive::Char(_) => PrimitiveKind::Char,
            Primitive::I8(_) => PrimitiveKind::I8,
            Primitive::I16(_) => PrimitiveKind::I16,
            Primitive::I32(_) => PrimitiveKind::I32,
            Primitive::I64(_) => PrimitiveKind::I64,
            Primitive::I128(_) => PrimitiveKind::I128,
            Primitive::U8(_) => PrimitiveKind::U8,
            Primitive::U16(_) => PrimitiveKind::U16,
            Primitive::U32(_) => PrimitiveKind::U32,
            Primitive::U64(_) => PrimitiveKind::U64,
            Primitive::U128(_) => PrimitiveKind::U128,
            Primitive::F32(_) => PrimitiveKind::F32,
            Primitive::F64(_) => PrimitiveKind::F64,
            Primitive::String(_) => PrimitiveKind::String,
            Primitive::Enum(value) => return Err(value),
        })
    }

    /// Returns the runtime type of the value.
    pub fn type_path(&self) -> TypePath {
        match self.kind_or_enum() {
            Ok(kind) => TypePath::new(kind.path()),
            Err(value) => value.ty.clone(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Primitive::Enum(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    /// Culture-invariant text form, enums print their variant name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(v) => fmt::Display::fmt(v, f),
            Primitive::Char(v) => fmt::Display::fmt(v, f),
            Primitive::I8(v) => fmt::Display::fmt(v, f),
            Primitive::I16(v) => fmt::Display::fmt(v, f),
            Primitive::I32(v) => fmt::Display::fmt(v, f),
            Primitive::I64(v) => fmt::Display::fmt(v, f),
            Primitive::I128(v) => fmt::Display::fmt(v, f),
            Primitive::U8(v) => fmt::Display::fmt(v, f),
            Primitive::U16(v) => fmt::Display::fmt(v, f),
            Primitive::U32(v) => fmt::Display::fmt(v, f),
            Primitive::U64(v) => fmt::Display::fmt(v, f),
            Primitive::U128(v) => fmt::Display::fmt(v, f),
            Primitive::F32(v) => fmt::Display::fmt(v, f),
            Primitive::F64(v) => fmt::Display::fmt(v, f),
            Primitive::String(v) => f.write_str(v),
            Primitive::Enum(v) => f.write_str(&v.variant),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                #[inline]
                fn from(value: $ty) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    f32 => F32,
    f64 => F64,
    Arc<str> => String,
    EnumValue => Enum,
}

impl From<&str> for Primitive {
    #[inline]
    fn from(value: &str) -> Self {
        Primitive::String(Arc::from(value))
    }
}

impl From<String> for Primitive {
    #[inline]
    fn from(value: String) -> Self {
        Primitive::String(Arc::from(value))
    }
}
