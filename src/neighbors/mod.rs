//! Neighbor-based anomaly detection.
//!
//! The Local Outlier Factor compares each sample's local density to that of
//! its k nearest neighbors: a point much sparser than its own neighborhood
//! is a local outlier, even when a global density threshold would miss it.
//! Scores near 1 mean the sample is as dense as its neighbors; the larger
//! the score, the more anomalous.
//!
//! The detector is composed against the [`NeighborSearch`] capability by
//! dependency injection. [`BruteForceNeighbors`] (exact linear scan) is the
//! default; any other implementation of the trait slots in through
//! [`LocalOutlierFactor::with_searcher`].
//!
//! # Algorithm
//!
//! 1. `k_distance(p)`: distance to p's k-th nearest neighbor.
//! 2. `reach_dist(p, o) = max(k_distance(o), d(p, o))` — smooths the
//!    distance so every member of a tight cluster sees its neighbors at a
//!    comparable reach.
//! 3. `lrd(p) = k / sum_o(reach_dist(p, o))` — local reachability density.
//! 4. `lof(p) = mean_o(lrd(o)) / lrd(p)` over p's k neighbors.
//!
//! Fit-set samples are never counted in their own neighborhood.
//!
//! # References
//!
//! - Breunig, Kriegel, Ng & Sander (2000) "LOF: Identifying Density-Based
//!   Local Outliers", SIGMOD.

mod search;

pub use search::{BruteForceNeighbors, Metric};

use serde::{Deserialize, Serialize};

use crate::error::{AislarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::{AnomalyDetector, NeighborSearch};
use crate::validation;

/// Local Outlier Factor detector.
///
/// # Examples
///
/// ```
/// use aislar::neighbors::LocalOutlierFactor;
/// use aislar::primitives::Matrix;
///
/// // A tight cluster and one distant point.
/// let data = Matrix::from_vec(7, 2, vec![
///     1.0, 1.0, 1.1, 1.0, 1.0, 1.1, 0.9, 1.0, 1.0, 0.9, 1.1, 1.1,
///     6.0, 6.0,
/// ]).unwrap();
///
/// let mut lof = LocalOutlierFactor::new().with_n_neighbors(3);
/// lof.fit(&data).unwrap();
///
/// let factors = lof.outlier_factors().unwrap();
/// assert!(factors[6] > factors[0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalOutlierFactor<S = BruteForceNeighbors> {
    n_neighbors: usize,
    searcher: S,
    k_dist_fit: Vec<f32>,
    neighbors_fit: Vec<Vec<usize>>,
    lrd_fit: Vec<f32>,
    n_features_in: Option<usize>,
}

impl LocalOutlierFactor<BruteForceNeighbors> {
    /// Creates a detector over the default exact searcher with
    /// `n_neighbors = 5` and the Euclidean metric.
    #[must_use]
    pub fn new() -> Self {
        Self::with_searcher(BruteForceNeighbors::new())
    }

    /// Sets the distance metric of the default searcher.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.searcher = BruteForceNeighbors::new().with_metric(metric);
        self
    }
}

impl Default for LocalOutlierFactor<BruteForceNeighbors> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NeighborSearch> LocalOutlierFactor<S> {
    /// Creates a detector over an injected k-NN searcher.
    #[must_use]
    pub fn with_searcher(searcher: S) -> Self {
        Self {
            n_neighbors: 5,
            searcher,
            k_dist_fit: Vec::new(),
            neighbors_fit: Vec::new(),
            lrd_fit: Vec::new(),
            n_features_in: None,
        }
    }

    /// Sets the neighborhood size `k`.
    #[must_use]
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// The configured neighborhood size.
    #[must_use]
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Returns true once the fit-set densities have been computed.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.n_features_in.is_some()
    }

    /// Feature count seen at fit time, if fitted.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features_in
    }

    /// Per-fit-sample distance to the k-th nearest neighbor (empty before
    /// fit).
    #[must_use]
    pub fn k_distances(&self) -> &[f32] {
        &self.k_dist_fit
    }

    /// Per-fit-sample local reachability density (empty before fit).
    #[must_use]
    pub fn local_reachability_densities(&self) -> &[f32] {
        &self.lrd_fit
    }

    /// Stores the reference set and precomputes every fit sample's
    /// k-distance, neighbor list and local reachability density. These are
    /// reused by every later scoring call.
    ///
    /// # Errors
    ///
    /// Returns an error on empty or non-finite input, or when the data
    /// holds fewer than `n_neighbors + 1` samples (self-exclusion leaves
    /// too few reference points). Nothing is mutated on failure.
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        validation::check_matrix(x, "LocalOutlierFactor::fit")?;
        if self.n_neighbors == 0 {
            return Err(AislarError::InvalidHyperparameter {
                param: "n_neighbors".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let (n_samples, n_features) = x.shape();
        if n_samples <= self.n_neighbors {
            return Err(AislarError::InvalidInput {
                message: format!(
                    "LocalOutlierFactor::fit: {n_samples} samples cannot support \
                     n_neighbors = {} with self-exclusion",
                    self.n_neighbors
                ),
            });
        }

        self.searcher.fit(x)?;
        let (distances, neighbors) = self.searcher.kneighbors_within_fit(self.n_neighbors)?;
        let k_dist: Vec<f32> = (0..n_samples)
            .map(|i| distances.get(i, self.n_neighbors - 1))
            .collect();
        let lrd = local_reachability(&distances, &neighbors, &k_dist, self.n_neighbors);

        self.k_dist_fit = k_dist;
        self.neighbors_fit = neighbors;
        self.lrd_fit = lrd;
        self.n_features_in = Some(n_features);
        Ok(())
    }

    /// Local outlier factor of every fit-set sample, each scored against a
    /// neighborhood that excludes itself.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted.
    pub fn outlier_factors(&self) -> Result<Vector<f32>> {
        if !self.is_fitted() {
            return Err(AislarError::not_fitted("LocalOutlierFactor"));
        }
        let factors: Vec<f32> = self
            .neighbors_fit
            .iter()
            .enumerate()
            .map(|(j, neighbors)| {
                let neighbor_lrd: f32 =
                    neighbors.iter().map(|&i| self.lrd_fit[i]).sum::<f32>()
                        / self.n_neighbors as f32;
                neighbor_lrd / self.lrd_fit[j]
            })
            .collect();
        Ok(Vector::from_vec(factors))
    }

    /// Local outlier factor of new samples against the fit set; larger
    /// means more anomalous, values near 1 are typical.
    ///
    /// A fit-set point passed back in is its own nearest neighbor here (no
    /// self-exclusion for query samples), which pulls its score toward 1.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted, on non-finite input, or on
    /// feature-count mismatch. The fitted state is never mutated.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let n_features_in = self
            .n_features_in
            .ok_or_else(|| AislarError::not_fitted("LocalOutlierFactor"))?;
        validation::check_matrix(x, "LocalOutlierFactor::predict")?;
        validation::check_feature_count(n_features_in, x.n_cols())?;

        let (distances, neighbors) = self.searcher.kneighbors(x, self.n_neighbors)?;
        let query_lrd = local_reachability(&distances, &neighbors, &self.k_dist_fit, self.n_neighbors);

        let factors: Vec<f32> = neighbors
            .iter()
            .enumerate()
            .map(|(j, row)| {
                let neighbor_lrd: f32 = row.iter().map(|&i| self.lrd_fit[i]).sum::<f32>()
                    / self.n_neighbors as f32;
                neighbor_lrd / query_lrd[j]
            })
            .collect();
        Ok(Vector::from_vec(factors))
    }

    /// Scores with the sign flipped: larger values mean more normal.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LocalOutlierFactor::predict`].
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        Ok(self.predict(x)?.scale(-1.0))
    }
}

impl<S: NeighborSearch> AnomalyDetector for LocalOutlierFactor<S> {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        LocalOutlierFactor::fit(self, x)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        LocalOutlierFactor::predict(self, x)
    }
}

/// Local reachability density of each query row.
///
/// `distances[j]` and `neighbors[j]` describe query j's k neighbors in the
/// fit set; `k_dist_fit` holds the fit set's own k-distances. The reach
/// distance to neighbor `i` is `max(k_dist_fit[i], d(j, i))`, and the
/// density is `k` over the summed reach. An all-duplicate neighborhood sums
/// to zero and the density follows IEEE division to infinity.
fn local_reachability(
    distances: &Matrix<f32>,
    neighbors: &[Vec<usize>],
    k_dist_fit: &[f32],
    k: usize,
) -> Vec<f32> {
    neighbors
        .iter()
        .enumerate()
        .map(|(j, row)| {
            let reach_sum: f32 = row
                .iter()
                .enumerate()
                .map(|(c, &i)| k_dist_fit[i].max(distances.get(j, c)))
                .sum();
            k as f32 / reach_sum
        })
        .collect()
}


#[cfg(test)]
#[path = "tests_lof_contract.rs"]
mod tests_lof_contract;
