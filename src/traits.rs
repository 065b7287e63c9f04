//! Core traits for anomaly detection estimators.
//!
//! These traits define the API contracts shared by the detectors and the
//! capability interface consumed by neighbor-based estimators.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for unsupervised anomaly detectors.
///
/// Detectors implement fit/predict following the convention that `predict`
/// returns one raw anomaly score per sample and `decision_function` flips
/// its sign so that larger values mean more normal. `Damex` overrides the
/// default because its scores already follow the lower-is-more-normal
/// convention.
///
/// # Examples
///
/// ```
/// use aislar::prelude::*;
///
/// // Tight cluster plus one far-away point.
/// let data = Matrix::from_vec(5, 2, vec![
///     0.0, 0.0, 0.1, 0.0, 0.0, 0.1, 0.1, 0.1,
///     8.0, 8.0,
/// ]).unwrap();
///
/// let mut forest = IsolationForest::new()
///     .with_n_estimators(25)
///     .with_random_state(42);
/// forest.fit(&data).unwrap();
/// let scores = forest.predict(&data).unwrap();
/// assert_eq!(scores.len(), 5);
/// ```
pub trait AnomalyDetector {
    /// Fits the detector to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters,
    /// non-finite values, etc.).
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Computes one anomaly score per sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector is not fitted or the feature count
    /// differs from the one seen at fit time.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;

    /// Scores with the sign flipped: larger values mean more normal.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AnomalyDetector::predict`].
    fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        Ok(self.predict(x)?.scale(-1.0))
    }
}

/// Capability interface for k-nearest-neighbor queries.
///
/// `LocalOutlierFactor` is composed against this trait by dependency
/// injection; [`crate::neighbors::BruteForceNeighbors`] is the exact-scan
/// implementation shipped with the crate.
pub trait NeighborSearch {
    /// Stores the reference sample set queries run against.
    ///
    /// # Errors
    ///
    /// Returns an error on empty or malformed data.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Finds the `k` nearest fit-set samples for every query row.
    ///
    /// Returns a `(distances, indices)` pair: `distances` has one row per
    /// query holding the `k` neighbor distances in ascending order, and
    /// `indices[i][j]` is the fit-set index of the `j`-th neighbor of query
    /// `i`. Ties are broken by fit-set index.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted, if `k` exceeds the fit-set size, or on
    /// feature-count mismatch.
    fn kneighbors(&self, x: &Matrix<f32>, k: usize) -> Result<(Matrix<f32>, Vec<Vec<usize>>)>;

    /// Finds the `k` nearest neighbors of every fit-set sample, excluding
    /// the sample itself from its own neighbor list.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted or if `k` is not below the fit-set size.
    fn kneighbors_within_fit(&self, k: usize) -> Result<(Matrix<f32>, Vec<Vec<usize>>)>;

    /// Number of stored fit-set samples (0 before fit).
    fn n_samples(&self) -> usize;
}
