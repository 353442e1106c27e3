use alloc::vec::Vec;
use core::cell::OnceCell;

use crate::array::{ArrayValue, Dimension};
use crate::value::Value;

// -----------------------------------------------------------------------------
// ArrayIndexer

/// Enumerates the coordinates of an array in row-major order.
///
/// The last dimension varies fastest and every coordinate honours its
/// dimension's lower bound. The full coordinate list is built lazily, once
/// per indexer.
///
/// # Examples
///
/// ```
/// use og_reflect::array::{ArrayIndexer, Dimension};
///
/// let indexer = ArrayIndexer::new(&[Dimension::new(2, 1), Dimension::new(2, -1)]);
///
/// let mut seen = Vec::new();
/// indexer.for_each(|index| seen.push(index.to_vec()));
///
/// assert_eq!(seen, [[1, -1], [1, 0], [2, -1], [2, 0]]);
/// assert_eq!(indexer.indexes().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayIndexer {
    dimensions: Vec<Dimension>,
    indexes: OnceCell<Vec<Vec<i32>>>,
}

impl ArrayIndexer {
    #[inline]
    pub fn new(dimensions: &[Dimension]) -> Self {
        Self {
            dimensions: dimensions.to_vec(),
            indexes: OnceCell::new(),
        }
    }

    /// Creates an indexer over the dimensions of `array`.
    #[inline]
    pub fn of(array: &ArrayValue) -> Self {
        Self::new(array.dimensions())
    }

    #[inline]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Visits every coordinate in row-major order.
    pub fn for_each(&self, mut visit: impl FnMut(&[i32])) {
        match self.dimensions.as_slice() {
            [] => {}
            [single] => {
                for index in single.indices() {
                    visit(&[index]);
                }
            }
            dimensions => {
                let mut prefix = Vec::with_capacity(dimensions.len());
                walk(dimensions, &mut prefix, &mut visit);
            }
        }
    }

    /// Returns every coordinate in row-major order.
    pub fn indexes(&self) -> &[Vec<i32>] {
        self.indexes.get_or_init(|| {
            let mut indexes = Vec::new();
            self.for_each(|index| indexes.push(index.to_vec()));
            indexes
        })
    }

    /// Returns the number of coordinates, saturating at `usize::MAX`.
    #[inline]
    pub fn len(&self) -> usize {
        if self.dimensions.is_empty() {
            return 0;
        }
        self.dimensions
            .iter()
            .map(Dimension::index_count)
            .fold(1, usize::saturating_mul)
    }

    /// Pairs every coordinate with its element.
    ///
    /// `array` is expected to have the dimensions of this indexer.
    pub fn values<'a>(
        &'a self,
        array: &'a ArrayValue,
    ) -> impl Iterator<Item = (&'a [i32], &'a Value)> {
        self.indexes()
            .iter()
            .map(Vec::as_slice)
            .zip(array.items())
    }
}

fn walk(dimensions: &[Dimension], prefix: &mut Vec<i32>, visit: &mut impl FnMut(&[i32])) {
    let Some((first, rest)) = dimensions.split_first() else {
        visit(prefix);
        return;
    };
    for index in first.indices() {
        prefix.push(index);
        walk(rest, prefix, visit);
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::ArrayIndexer;
    use crate::array::{ArrayValue, Dimension};
    use crate::value::Value;

    #[test]
    fn single_dimension_honours_lower_bound() {
        let indexer = ArrayIndexer::new(&[Dimension::new(3, 5)]);
        let mut seen = Vec::new();
        indexer.for_each(|i| seen.push(i[0]));
        assert_eq!(seen, [5, 6, 7]);
    }

    #[test]
    fn three_dimensions() {
        let indexer = ArrayIndexer::new(&[
            Dimension::new(2, 0),
            Dimension::new(1, 3),
            Dimension::new(2, 0),
        ]);
        assert_eq!(
            indexer.indexes(),
            [
                vec![0, 3, 0],
                vec![0, 3, 1],
                vec![1, 3, 0],
                vec![1, 3, 1]
            ]
        );
    }

    #[test]
    fn coordinates_never_wrap() {
        let indexer = ArrayIndexer::new(&[Dimension::new(4, i32::MAX - 1)]);
        let mut seen = Vec::new();
        indexer.for_each(|i| seen.push(i[0]));
        assert_eq!(seen, [i32::MAX - 1, i32::MAX]);
        assert_eq!(indexer.len(), 2);
    }

    #[test]
    fn empty_dimension_yields_nothing() {
        let indexer = ArrayIndexer::new(&[Dimension::new(2, 0), Dimension::new(0, 0)]);
        assert!(indexer.indexes().is_empty());
        assert_eq!(indexer.len(), 0);
    }

    #[test]
    fn values_pair_indexes_with_elements() {
        let array = ArrayValue::from_elements(
            "i32",
            [Dimension::new(2, 1), Dimension::new(2, 0)],
            (1..=4_i32).map(Value::from).collect(),
        )
        .unwrap();
        let indexer = ArrayIndexer::of(&array);

        let pairs: Vec<(Vec<i32>, i32)> = indexer
            .values(&array)
            .map(|(index, value)| {
                let n = match value.as_primitive() {
                    Some(crate::value::Primitive::I32(n)) => *n,
                    _ => 0,
                };
                (index.to_vec(), n)
            })
            .collect();
        assert_eq!(
            pairs,
            [
                (vec![1, 0], 1),
                (vec![1, 1], 2),
                (vec![2, 0], 3),
                (vec![2, 1], 4)
            ]
        );
    }
}
