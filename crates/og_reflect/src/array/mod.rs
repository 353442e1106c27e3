//! Provide rectangular arrays with lower bounds.
//!
//! - [`ArrayValue`]: Row-major elements plus one [`Dimension`] per rank.
//! - [`ArrayIndexer`]: Enumerates every coordinate in row-major order.
//! - [`BoundsError`]: Rank, range and length failures.

// -----------------------------------------------------------------------------
// Modules

mod indexer;

// -----------------------------------------------------------------------------
// Exports

pub use indexer::ArrayIndexer;

use alloc::vec::Vec;

use thiserror::Error;

use crate::info::TypePath;
use crate::value::Value;

// -----------------------------------------------------------------------------
// BoundsError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoundsError {
    #[error("Array of rank {expected} indexed with {found} coordinates")]
    RankMismatch { expected: usize, found: usize },

    #[error(
        "Index {index} is out of range in dimension {dimension} (lower bound {lower_bound}, length {length})"
    )]
    OutOfRange {
        dimension: usize,
        index: i32,
        lower_bound: i32,
        length: usize,
    },

    #[error("Array dimensions hold {expected} elements, {found} were given")]
    LengthMismatch { expected: usize, found: usize },

    #[error(
        "Dimension {dimension} (lower bound {lower_bound}, length {length}) has indices beyond `i32::MAX`"
    )]
    BoundOverflow {
        dimension: usize,
        lower_bound: i32,
        length: usize,
    },

    #[error("Array dimensions {dimensions:?} hold more elements than can be allocated")]
    TooLarge { dimensions: Vec<Dimension> },
}

// -----------------------------------------------------------------------------
// Dimension

/// Length and lower bound of one array dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub length: usize,
    pub lower_bound: i32,
}

impl Dimension {
    #[inline]
    pub const fn new(length: usize, lower_bound: i32) -> Self {
        Self {
            length,
            lower_bound,
        }
    }

    /// Iterates over the indices of this dimension, stopping at `i32::MAX`.
    #[inline]
    pub fn indices(&self) -> impl Iterator<Item = i32> + use<> {
        (self.lower_bound..=i32::MAX).take(self.length)
    }

    /// Returns the number of indices [`indices`](Self::indices) yields.
    pub(crate) fn index_count(&self) -> usize {
        let room = i64::from(i32::MAX) - i64::from(self.lower_bound) + 1;
        usize::try_from(room).map_or(self.length, |room| self.length.min(room))
    }

    /// Returns `true` if every index of this dimension fits an `i32`.
    pub fn is_addressable(&self) -> bool {
        let Some(last) = self.length.checked_sub(1) else {
            return true;
        };
        i64::try_from(last)
            .ok()
            .and_then(|last| last.checked_add(i64::from(self.lower_bound)))
            .is_some_and(|last| last <= i64::from(i32::MAX))
    }

    /// Returns the offset of `index` inside this dimension, if in range.
    #[inline]
    fn offset(&self, index: i32) -> Option<usize> {
        let offset = i64::from(index) - i64::from(self.lower_bound);
        usize::try_from(offset).ok().filter(|o| *o < self.length)
    }
}

/// Returns the element count of `dimensions`, checking every bound.
fn element_count(dimensions: &[Dimension]) -> Result<usize, BoundsError> {
    let mut count: usize = 1;
    for (dimension, dim) in dimensions.iter().enumerate() {
        if !dim.is_addressable() {
            return Err(BoundsError::BoundOverflow {
                dimension,
                lower_bound: dim.lower_bound,
                length: dim.length,
            });
        }
        count = count
            .checked_mul(dim.length)
            .ok_or_else(|| BoundsError::TooLarge {
                dimensions: dimensions.to_vec(),
            })?;
    }
    Ok(count)
}

// -----------------------------------------------------------------------------
// ArrayValue

/// A rectangular array of any rank.
///
/// Elements are stored in row-major order, the last dimension varies fastest.
/// Fresh arrays are filled with [`Value::Null`].
///
/// # Examples
///
/// ```
/// use og_reflect::array::{ArrayValue, Dimension};
/// use og_reflect::value::Value;
///
/// let mut grid = ArrayValue::new("i32", [Dimension::new(2, 1), Dimension::new(3, 0)]).unwrap();
/// grid.set(&[2, 1], Value::from(7_i32)).unwrap();
///
/// assert_eq!(grid.len(), 6);
/// assert!(grid.get(&[1, 1]).unwrap().is_null());
/// assert!(grid.get(&[0, 0]).is_err());
/// assert_eq!(grid.items()[4].as_primitive(), Value::from(7_i32).as_primitive());
///
/// assert!(ArrayValue::new("i32", [Dimension::new(4, i32::MAX)]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ArrayValue {
    element_type: TypePath,
    dimensions: Vec<Dimension>,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Creates an array filled with `Null`.
    ///
    /// Fails when an index would leave the `i32` range or the elements
    /// cannot be allocated.
    pub fn new(
        element_type: impl Into<TypePath>,
        dimensions: impl IntoIterator<Item = Dimension>,
    ) -> Result<Self, BoundsError> {
        let dimensions: Vec<Dimension> = dimensions.into_iter().collect();
        let len = element_count(&dimensions)?;
        let mut items = Vec::new();
        if items.try_reserve_exact(len).is_err() {
            return Err(BoundsError::TooLarge { dimensions });
        }
        items.resize(len, Value::Null);
        Ok(Self {
            element_type: element_type.into(),
            dimensions,
            items,
        })
    }

    /// Creates a rank 1 array from its items.
    pub fn from_items(
        element_type: impl Into<TypePath>,
        lower_bound: i32,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<Self, BoundsError> {
        let items: Vec<Value> = items.into_iter().collect();
        Self::from_elements(element_type, [Dimension::new(items.len(), lower_bound)], items)
    }

    /// Creates an array from row-major elements.
    pub fn from_elements(
        element_type: impl Into<TypePath>,
        dimensions: impl IntoIterator<Item = Dimension>,
        items: Vec<Value>,
    ) -> Result<Self, BoundsError> {
        let dimensions: Vec<Dimension> = dimensions.into_iter().collect();
        let expected = element_count(&dimensions)?;
        if items.len() != expected {
            return Err(BoundsError::LengthMismatch {
                expected,
                found: items.len(),
            });
        }
        Ok(Self {
            element_type: element_type.into(),
            dimensions,
            items,
        })
    }

    #[inline]
    pub fn element_type(&self) -> &TypePath {
        &self.element_type
    }

    /// Returns the array type path, for example `i32[,]`.
    #[inline]
    pub fn type_path(&self) -> TypePath {
        TypePath::array_of(&self.element_type, self.rank())
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    #[inline]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Returns the row-major offset of `indices`.
    pub fn offset(&self, indices: &[i32]) -> Result<usize, BoundsError> {
        if indices.len() != self.dimensions.len() {
            return Err(BoundsError::RankMismatch {
                expected: self.dimensions.len(),
                found: indices.len(),
            });
        }
        let mut offset = 0;
        for (dimension, (dim, &index)) in self.dimensions.iter().zip(indices).enumerate() {
            let local = dim.offset(index).ok_or(BoundsError::OutOfRange {
                dimension,
                index,
                lower_bound: dim.lower_bound,
                length: dim.length,
            })?;
            offset = offset * dim.length + local;
        }
        Ok(offset)
    }

    pub fn get(&self, indices: &[i32]) -> Result<&Value, BoundsError> {
        let offset = self.offset(indices)?;
        Ok(&self.items[offset])
    }

    /// Replaces the element at `indices`, returns the previous one.
    pub fn set(&mut self, indices: &[i32], value: Value) -> Result<Value, BoundsError> {
        let offset = self.offset(indices)?;
        Ok(core::mem::replace(&mut self.items[offset], value))
    }
}
