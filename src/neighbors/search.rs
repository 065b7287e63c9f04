//! Exact k-nearest-neighbor search over a stored sample set.
//!
//! [`BruteForceNeighbors`] is the reference implementation of the
//! [`NeighborSearch`] capability: a full linear scan per query, exact
//! results, no index build cost. Suitable for the sample counts anomaly
//! detectors are typically fitted on; an approximate index can be swapped
//! in through the same trait without touching the detectors.

use serde::{Deserialize, Serialize};

use crate::error::{AislarError, Result};
use crate::primitives::Matrix;
use crate::traits::NeighborSearch;
use crate::validation;

/// Distance metric used for neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Metric {
    /// L2 distance (Minkowski with p = 2).
    Euclidean,
    /// L1 distance (Minkowski with p = 1).
    Manhattan,
    /// L-infinity distance: the largest coordinate difference.
    Chebyshev,
    /// General Minkowski distance with exponent `p > 0`.
    Minkowski(f32),
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Euclidean
    }
}

impl Metric {
    /// Distance between two equal-length feature vectors.
    #[must_use]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            Metric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
            Metric::Chebyshev => a
                .iter()
                .zip(b.iter())
                .fold(0.0_f32, |acc, (x, y)| acc.max((x - y).abs())),
            Metric::Minkowski(p) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs().powf(*p))
                .sum::<f32>()
                .powf(1.0 / p),
        }
    }
}

/// Exact k-NN searcher backed by a linear scan.
///
/// # Examples
///
/// ```
/// use aislar::neighbors::BruteForceNeighbors;
/// use aislar::primitives::Matrix;
/// use aislar::traits::NeighborSearch;
///
/// let data = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 10.0]).unwrap();
/// let mut searcher = BruteForceNeighbors::new();
/// searcher.fit(&data).unwrap();
///
/// let query = Matrix::from_vec(1, 1, vec![1.4]).unwrap();
/// let (distances, indices) = searcher.kneighbors(&query, 2).unwrap();
/// assert_eq!(indices[0], vec![1, 2]);
/// assert!((distances.get(0, 0) - 0.4).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BruteForceNeighbors {
    metric: Metric,
    data: Option<Matrix<f32>>,
}

impl BruteForceNeighbors {
    /// Creates a searcher with the Euclidean metric.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metric: Metric::Euclidean,
            data: None,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// The configured distance metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The `k` nearest stored rows to `query`, sorted by ascending
    /// distance with ties broken by row index. `skip` excludes one stored
    /// row (a fit-set sample querying its own neighborhood).
    fn nearest(&self, data: &Matrix<f32>, query: &[f32], k: usize, skip: Option<usize>) -> Vec<(f32, usize)> {
        let mut candidates: Vec<(f32, usize)> = (0..data.n_rows())
            .filter(|&i| Some(i) != skip)
            .map(|i| (self.metric.distance(query, data.row_slice(i)), i))
            .collect();
        candidates.sort_unstable_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        candidates.truncate(k);
        candidates
    }

    fn query_against(
        &self,
        data: &Matrix<f32>,
        queries: &Matrix<f32>,
        k: usize,
        self_query: bool,
    ) -> Result<(Matrix<f32>, Vec<Vec<usize>>)> {
        let n_queries = queries.n_rows();
        let mut distances = Vec::with_capacity(n_queries * k);
        let mut indices = Vec::with_capacity(n_queries);
        for i in 0..n_queries {
            let skip = if self_query { Some(i) } else { None };
            let found = self.nearest(data, queries.row_slice(i), k, skip);
            let mut row_indices = Vec::with_capacity(k);
            for (d, j) in found {
                distances.push(d);
                row_indices.push(j);
            }
            indices.push(row_indices);
        }
        let distances = Matrix::from_vec(n_queries, k, distances)?;
        Ok((distances, indices))
    }

    fn check_k(&self, k: usize, available: usize, context: &str) -> Result<()> {
        if k == 0 {
            return Err(AislarError::InvalidHyperparameter {
                param: "k".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if k > available {
            return Err(AislarError::InvalidInput {
                message: format!(
                    "{context}: k = {k} exceeds the {available} available reference samples"
                ),
            });
        }
        Ok(())
    }
}

impl NeighborSearch for BruteForceNeighbors {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        validation::check_matrix(x, "BruteForceNeighbors::fit")?;
        self.data = Some(x.clone());
        Ok(())
    }

    fn kneighbors(&self, x: &Matrix<f32>, k: usize) -> Result<(Matrix<f32>, Vec<Vec<usize>>)> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| AislarError::not_fitted("BruteForceNeighbors"))?;
        validation::check_matrix(x, "BruteForceNeighbors::kneighbors")?;
        validation::check_feature_count(data.n_cols(), x.n_cols())?;
        self.check_k(k, data.n_rows(), "kneighbors")?;
        self.query_against(data, x, k, false)
    }

    fn kneighbors_within_fit(&self, k: usize) -> Result<(Matrix<f32>, Vec<Vec<usize>>)> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| AislarError::not_fitted("BruteForceNeighbors"))?;
        // Each sample is excluded from its own neighborhood, so only
        // n - 1 reference rows are available per query.
        self.check_k(k, data.n_rows().saturating_sub(1), "kneighbors_within_fit")?;
        let queries = data.clone();
        self.query_against(data, &queries, k, true)
    }

    fn n_samples(&self) -> usize {
        self.data.as_ref().map_or(0, Matrix::n_rows)
    }
}
