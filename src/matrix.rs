//! Binary attribute matrix.

use crate::error::{EntrofyError, Result};

/// An immutable `n x f` matrix of binary attributes.
///
/// Rows are candidates, columns are attributes. Entries are stored
/// row-major as `0`/`1` bytes so a row can be summed into running column
/// counts without branching.
///
/// # Examples
///
/// ```
/// use u_entrofy::AttributeMatrix;
///
/// let x = AttributeMatrix::from_rows(&[
///     vec![true, false],
///     vec![false, false],
///     vec![true, true],
/// ])
/// .unwrap();
/// assert_eq!(x.n_rows(), 3);
/// assert_eq!(x.n_attributes(), 2);
/// assert!(x.get(2, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeMatrix {
    n_rows: usize,
    n_attributes: usize,
    data: Vec<u8>,
}

impl AttributeMatrix {
    /// Builds a matrix from row slices.
    ///
    /// The attribute count is taken from the first row. An empty slice
    /// produces a `0 x 0` matrix.
    ///
    /// # Errors
    /// [`EntrofyError::ShapeMismatch`] if any row length differs from the
    /// first.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let n_attributes = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * n_attributes);

        for row in rows {
            let row = row.as_ref();
            if row.len() != n_attributes {
                return Err(EntrofyError::ShapeMismatch {
                    what: "matrix row",
                    expected: n_attributes,
                    actual: row.len(),
                });
            }
            data.extend(row.iter().map(|&b| u8::from(b)));
        }

        Ok(Self {
            n_rows: rows.len(),
            n_attributes,
            data,
        })
    }

    /// Builds a matrix by evaluating `f(row, attribute)` for every entry.
    pub fn from_fn<F>(n_rows: usize, n_attributes: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut data = Vec::with_capacity(n_rows * n_attributes);
        for i in 0..n_rows {
            for j in 0..n_attributes {
                data.push(u8::from(f(i, j)));
            }
        }
        Self {
            n_rows,
            n_attributes,
            data,
        }
    }

    /// Number of candidate rows (`n`).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of attributes (`f`).
    pub fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    /// Returns entry `(row, attribute)`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, attribute: usize) -> bool {
        assert!(attribute < self.n_attributes, "attribute index out of bounds");
        self.data[row * self.n_attributes + attribute] != 0
    }

    /// Returns a row as `0`/`1` bytes.
    ///
    /// # Panics
    /// Panics if `row >= n_rows()`.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.n_attributes;
        &self.data[start..start + self.n_attributes]
    }

    /// Column-wise mean over the given rows.
    ///
    /// Returns all zeros when `rows` is empty.
    ///
    /// # Panics
    /// Panics if any row index is out of bounds.
    pub fn column_means(&self, rows: &[usize]) -> Vec<f64> {
        let mut sums = vec![0usize; self.n_attributes];
        for &r in rows {
            for (s, &x) in sums.iter_mut().zip(self.row(r)) {
                *s += usize::from(x);
            }
        }
        if rows.is_empty() {
            return vec![0.0; self.n_attributes];
        }
        let count = rows.len() as f64;
        sums.into_iter().map(|s| s as f64 / count).collect()
    }
}
