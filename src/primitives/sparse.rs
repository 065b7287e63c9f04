//! Sparse matrix layouts (compressed row and compressed column).
//!
//! Anomaly detectors accept sparse input through these types: compressed
//! column (CSC) at training time, compressed row (CSR) at scoring time.
//! Each call site declares the layouts it accepts; a layout outside that
//! whitelist is rejected rather than silently converted.

use super::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a sparse storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SparseFormat {
    /// Compressed sparse row.
    Csr,
    /// Compressed sparse column.
    Csc,
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparseFormat::Csr => write!(f, "CSR"),
            SparseFormat::Csc => write!(f, "CSC"),
        }
    }
}

/// Compressed sparse row matrix.
///
/// `indptr` has `rows + 1` entries; row `r` owns the half-open range
/// `indptr[r]..indptr[r + 1]` of `indices` (column positions) and `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl CsrMatrix {
    /// Builds a CSR matrix from its raw triplet arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the index pointer is malformed, the index and
    /// value arrays disagree in length, or a column index is out of bounds.
    pub fn from_parts(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self, &'static str> {
        check_compressed_parts(rows, cols, &indptr, &indices, &values)?;
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        })
    }

    /// Builds a CSR matrix from a dense one, dropping exact zeros.
    #[must_use]
    pub fn from_dense(dense: &Matrix<f32>) -> Self {
        let (rows, cols) = dense.shape();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for r in 0..rows {
            for (c, &v) in dense.row_slice(r).iter().enumerate() {
                if v != 0.0 {
                    indices.push(c);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored (explicit) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Gets element at (row, col), returning 0.0 for unstored positions.
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let range = self.indptr[row]..self.indptr[row + 1];
        for (pos, &c) in self.indices[range.clone()].iter().enumerate() {
            if c == col {
                return self.values[range.start + pos];
            }
        }
        0.0
    }

    /// Expands to a dense matrix.
    #[must_use]
    pub fn to_dense(&self) -> Matrix<f32> {
        let mut dense = Matrix::zeros(self.rows, self.cols);
        for r in 0..self.rows {
            for pos in self.indptr[r]..self.indptr[r + 1] {
                dense.set(r, self.indices[pos], self.values[pos]);
            }
        }
        dense
    }
}

/// Compressed sparse column matrix.
///
/// `indptr` has `cols + 1` entries; column `c` owns the half-open range
/// `indptr[c]..indptr[c + 1]` of `indices` (row positions) and `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CscMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl CscMatrix {
    /// Builds a CSC matrix from its raw triplet arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the index pointer is malformed, the index and
    /// value arrays disagree in length, or a row index is out of bounds.
    pub fn from_parts(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self, &'static str> {
        check_compressed_parts(cols, rows, &indptr, &indices, &values)?;
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        })
    }

    /// Builds a CSC matrix from a dense one, dropping exact zeros.
    #[must_use]
    pub fn from_dense(dense: &Matrix<f32>) -> Self {
        let (rows, cols) = dense.shape();
        let mut indptr = Vec::with_capacity(cols + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for c in 0..cols {
            for r in 0..rows {
                let v = dense.get(r, c);
                if v != 0.0 {
                    indices.push(r);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            values,
        }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored (explicit) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Gets element at (row, col), returning 0.0 for unstored positions.
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let range = self.indptr[col]..self.indptr[col + 1];
        for (pos, &r) in self.indices[range.clone()].iter().enumerate() {
            if r == row {
                return self.values[range.start + pos];
            }
        }
        0.0
    }

    /// Expands to a dense matrix.
    #[must_use]
    pub fn to_dense(&self) -> Matrix<f32> {
        let mut dense = Matrix::zeros(self.rows, self.cols);
        for c in 0..self.cols {
            for pos in self.indptr[c]..self.indptr[c + 1] {
                dense.set(self.indices[pos], c, self.values[pos]);
            }
        }
        dense
    }
}

/// A sparse matrix in one of the supported layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SparseMatrix {
    /// Compressed sparse row payload.
    Csr(CsrMatrix),
    /// Compressed sparse column payload.
    Csc(CscMatrix),
}

impl SparseMatrix {
    /// The layout of the wrapped matrix.
    #[must_use]
    pub fn format(&self) -> SparseFormat {
        match self {
            SparseMatrix::Csr(_) => SparseFormat::Csr,
            SparseMatrix::Csc(_) => SparseFormat::Csc,
        }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            SparseMatrix::Csr(m) => m.shape(),
            SparseMatrix::Csc(m) => m.shape(),
        }
    }

    /// Number of stored (explicit) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        match self {
            SparseMatrix::Csr(m) => m.nnz(),
            SparseMatrix::Csc(m) => m.nnz(),
        }
    }

    /// Expands to a dense matrix.
    #[must_use]
    pub fn to_dense(&self) -> Matrix<f32> {
        match self {
            SparseMatrix::Csr(m) => m.to_dense(),
            SparseMatrix::Csc(m) => m.to_dense(),
        }
    }
}

impl From<CsrMatrix> for SparseMatrix {
    fn from(m: CsrMatrix) -> Self {
        SparseMatrix::Csr(m)
    }
}

impl From<CscMatrix> for SparseMatrix {
    fn from(m: CscMatrix) -> Self {
        SparseMatrix::Csc(m)
    }
}

/// Shared structural checks for compressed layouts.
///
/// `outer` is the compressed axis length (rows for CSR, cols for CSC) and
/// `inner` the bound for stored indices.
fn check_compressed_parts(
    outer: usize,
    inner: usize,
    indptr: &[usize],
    indices: &[usize],
    values: &[f32],
) -> Result<(), &'static str> {
    if indptr.len() != outer + 1 {
        return Err("Index pointer length must equal outer dimension + 1");
    }
    if indptr[0] != 0 {
        return Err("Index pointer must start at 0");
    }
    if indptr[outer] != indices.len() {
        return Err("Index pointer must end at the number of stored entries");
    }
    if indices.len() != values.len() {
        return Err("Index and value arrays must have equal length");
    }
    if indptr.windows(2).any(|w| w[0] > w[1]) {
        return Err("Index pointer must be non-decreasing");
    }
    if indices.iter().any(|&i| i >= inner) {
        return Err("Stored index out of bounds");
    }
    Ok(())
}
