//! Core compute primitives (Vector, Matrix, sparse layouts).
//!
//! These types provide the foundation for all detector algorithms.

mod matrix;
mod sparse;
mod vector;

pub use matrix::Matrix;
pub use sparse::{CscMatrix, CsrMatrix, SparseFormat, SparseMatrix};
pub use vector::Vector;

#[cfg(test)]
#[path = "tests_matrix_contract.rs"]
mod tests_matrix_contract;

#[cfg(test)]
#[path = "tests_vector_contract.rs"]
mod tests_vector_contract;
