use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// The full name of a type, for example `app::Person` or `Vec<app::Person>`.
///
/// Array types use the `T[]` syntax, one comma per extra dimension:
/// `i32[]` is rank 1, `i32[,]` is rank 2.
///
/// Cloning is a reference count increment.
///
/// # Examples
///
/// ```
/// use og_reflect::info::TypePath;
///
/// let path = TypePath::new("alloc::vec::Vec<app::Person>");
/// assert_eq!(path.short_name(), "Vec<Person>");
///
/// let grid = TypePath::array_of(&"i32".into(), 2);
/// assert_eq!(grid.as_str(), "i32[,]");
/// assert_eq!(grid.array_element(), Some((TypePath::new("i32"), 2)));
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypePath(Arc<str>);

impl TypePath {
    #[inline]
    pub fn new(path: &str) -> Self {
        Self(Arc::from(path))
    }

    /// Returns the array type of `element` with `rank` dimensions.
    ///
    /// `rank` is clamped to at least 1.
    pub fn array_of(element: &TypePath, rank: usize) -> Self {
        let mut path = String::with_capacity(element.0.len() + rank + 1);
        path.push_str(&element.0);
        path.push('[');
        for _ in 1..rank.max(1) {
            path.push(',');
        }
        path.push(']');
        Self(Arc::from(path))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the path uses array syntax.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.array_element().is_some()
    }

    /// Returns the element type and rank of an array path.
    ///
    /// Only the outermost brackets are considered, so `i32[][]` is a rank 1
    /// array of `i32[]`.
    pub fn array_element(&self) -> Option<(TypePath, usize)> {
        let body = self.0.strip_suffix(']')?;
        let open = body.rfind('[')?;
        let commas = &body[open + 1..];
        if open == 0 || !commas.bytes().all(|b| b == b',') {
            return None;
        }
        Some((TypePath::new(&body[..open]), commas.len() + 1))
    }

    /// Returns the name without module paths.
    ///
    /// Generic arguments are shortened too: `alloc::vec::Vec<app::Person>`
    /// becomes `Vec<Person>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        // Index in `out` where the current path segment starts.
        let mut segment = 0;
        let mut chars = self.0.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                ':' if chars.peek() == Some(&':') => {
                    chars.next();
                    out.truncate(segment);
                }
                '<' | '>' | ',' | ' ' | '[' | ']' | '(' | ')' | '&' => {
                    out.push(c);
                    segment = out.len();
                }
                _ => out.push(c),
            }
        }
        out
    }
}

impl Borrow<str> for TypePath {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypePath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypePath {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypePath {
    #[inline]
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&TypePath> for TypePath {
    #[inline]
    fn from(value: &TypePath) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for TypePath {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypePath {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for TypePath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypePath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
