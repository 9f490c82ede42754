//! Row-major 2D storage for per-vertex tile data.

/// A `rows × cols` grid stored row-major.
///
/// For tiles, the row index is the `v` sample index and the column index is
/// the `u` sample index.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid by calling `f(row, col)` for every cell, row by row.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(rows.checked_mul(cols).unwrap_or(0));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self { rows, cols, cells }
    }

    /// Like [`from_fn`](Self::from_fn) but stops at the first error.
    pub fn try_from_fn<E>(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut cells = Vec::with_capacity(rows.checked_mul(cols).unwrap_or(0));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col)?);
            }
        }
        Ok(Self { rows, cols, cells })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at `(row, col)`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// All cells, row by row.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// A grid of the same shape with `f` applied to every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// The underlying row-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
