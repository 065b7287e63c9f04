//! Isolation Forest anomaly detection.
//!
//! An isolation forest scores samples by how quickly an ensemble of
//! randomized partition trees separates them from the rest of the data.
//! Anomalies are few and different, so random splits isolate them close to
//! the root; typical samples need many splits.
//!
//! # Algorithm
//!
//! 1. Draw `n_estimators` sub-samples of size `max_samples` (with or
//!    without replacement per `bootstrap`, optionally weighted).
//! 2. Build one randomized partition tree per sub-sample: every internal
//!    node splits on a uniformly random feature at a uniformly random
//!    threshold inside the observed range, down to a depth cap of
//!    `ceil(log2(max(max_samples, 2)))`.
//! 3. Score a sample as `2^(-mean_depth / c(max_samples))`, where `c(n)`
//!    is the average path length of an unsuccessful binary-search-tree
//!    lookup among `n` items. Scores live in (0, 1]; values near 1 flag
//!    anomalies, values near 0.5 are typical.
//!
//! # References
//!
//! - Liu, Ting & Zhou (2008) "Isolation Forest", ICDM.
//! - Liu, Ting & Zhou (2012) "Isolation-based anomaly detection", TKDD.

mod tree;

pub use tree::{IsoNode, IsoTree, LeafNode, SplitNode};

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AislarError, Result};
use crate::primitives::{Matrix, SparseFormat, SparseMatrix, Vector};
use crate::traits::AnomalyDetector;
use crate::validation;

/// Euler-Mascheroni constant, used by the path-length normalizer.
pub const EULER_GAMMA: f32 = 0.577_215_664_9;

/// Average path length of an unsuccessful binary-search-tree lookup among
/// `n` items.
///
/// `c(n) = 2 * (ln(n) + gamma) - 2 * (n - 1) / n` for `n >= 2`, and 1 for
/// `n <= 1`. Normalizes raw isolation depths so scores are comparable
/// across sub-sample sizes, and corrects the depth of leaves that still
/// hold several samples.
#[must_use]
pub fn average_path_length(n: usize) -> f32 {
    if n <= 1 {
        return 1.0;
    }
    let n = n as f32;
    2.0 * (n.ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

/// Sub-sample size per tree: an absolute count or a fraction of the
/// training set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxSamples {
    /// Absolute number of samples (clamped to the training-set size).
    Count(usize),
    /// Fraction of the training-set size, in (0, 1].
    Fraction(f32),
}

impl Default for MaxSamples {
    fn default() -> Self {
        MaxSamples::Count(256)
    }
}

/// Feature-subset size per tree: an absolute count or a fraction of the
/// feature count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Absolute number of features (clamped to the feature count).
    Count(usize),
    /// Fraction of the feature count, in (0, 1].
    Fraction(f32),
}

impl Default for MaxFeatures {
    fn default() -> Self {
        MaxFeatures::Fraction(1.0)
    }
}

/// Isolation Forest detector.
///
/// # Examples
///
/// ```
/// use aislar::forest::IsolationForest;
/// use aislar::primitives::Matrix;
///
/// // A tight cluster and one isolated point.
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 0.1, 0.2, 0.0, 0.1,
///     9.0, 9.0,
/// ]).unwrap();
///
/// let mut forest = IsolationForest::new()
///     .with_n_estimators(50)
///     .with_random_state(42);
/// forest.fit(&data).unwrap();
///
/// let scores = forest.predict(&data).unwrap();
/// // The isolated point is easier to separate than the cluster members.
/// assert!(scores[5] > scores[0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: MaxSamples,
    max_features: MaxFeatures,
    bootstrap: bool,
    random_state: Option<u64>,
    trees: Vec<IsoTree>,
    in_bag_indices: Vec<Vec<usize>>,
    n_features_in: Option<usize>,
    effective_max_samples: Option<usize>,
}

impl IsolationForest {
    /// Creates a detector with default hyperparameters (100 trees,
    /// sub-samples of 256 drawn with replacement, all features).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            max_samples: MaxSamples::default(),
            max_features: MaxFeatures::default(),
            bootstrap: true,
            random_state: None,
            trees: Vec::new(),
            in_bag_indices: Vec::new(),
            n_features_in: None,
            effective_max_samples: None,
        }
    }

    /// Sets the number of trees in the ensemble.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the sub-sample size per tree as an absolute count.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = MaxSamples::Count(max_samples);
        self
    }

    /// Sets the sub-sample size per tree as a fraction of the training set.
    #[must_use]
    pub fn with_max_samples_fraction(mut self, fraction: f32) -> Self {
        self.max_samples = MaxSamples::Fraction(fraction);
        self
    }

    /// Sets the feature-subset size per tree as an absolute count.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = MaxFeatures::Count(max_features);
        self
    }

    /// Sets the feature-subset size per tree as a fraction of the feature
    /// count.
    #[must_use]
    pub fn with_max_features_fraction(mut self, fraction: f32) -> Self {
        self.max_features = MaxFeatures::Fraction(fraction);
        self
    }

    /// Selects drawing sub-samples with (`true`, default) or without
    /// replacement.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Sets the random state for reproducibility. Tree `i` is built from a
    /// generator seeded `random_state + i`.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns true once the ensemble has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.n_features_in.is_some()
    }

    /// Feature count seen at fit time, if fitted.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features_in
    }

    /// Sub-sample size actually used at fit time (after clamping), if
    /// fitted. This is the `n` the score normalizer `c(n)` is evaluated at.
    #[must_use]
    pub fn effective_max_samples(&self) -> Option<usize> {
        self.effective_max_samples
    }

    /// The fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[IsoTree] {
        &self.trees
    }

    /// In-bag sample indices per tree, parallel to [`IsolationForest::trees`].
    #[must_use]
    pub fn in_bag_indices(&self) -> &[Vec<usize>] {
        &self.in_bag_indices
    }

    /// Fits the ensemble on dense data.
    ///
    /// # Errors
    ///
    /// Returns an error on empty or non-finite input, or on invalid
    /// hyperparameters. Nothing is mutated on failure.
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        self.fit_weighted(x, None)
    }

    /// Fits the ensemble on compressed-column sparse data.
    ///
    /// Training accepts the CSC layout only; scoring accepts CSR. Other
    /// layouts are rejected rather than silently converted.
    ///
    /// # Errors
    ///
    /// Returns [`AislarError::UnsupportedSparseLayout`] for a non-CSC
    /// payload, plus the failure modes of [`IsolationForest::fit`].
    pub fn fit_sparse(&mut self, x: &SparseMatrix) -> Result<()> {
        let dense = validation::check_sparse(x, &[SparseFormat::Csc], "IsolationForest::fit")?;
        self.fit_weighted(&dense, None)
    }

    /// Fits the ensemble with per-sample weights steering the sub-sample
    /// draws. A sample with twice the weight is twice as likely to enter
    /// each tree's in-bag set.
    ///
    /// # Errors
    ///
    /// Returns an error on empty or non-finite input, malformed weights
    /// (wrong length, negative, NaN, zero total mass), or invalid
    /// hyperparameters. Nothing is mutated on failure.
    pub fn fit_weighted(&mut self, x: &Matrix<f32>, sample_weight: Option<&[f32]>) -> Result<()> {
        validation::check_matrix(x, "IsolationForest::fit")?;
        let (n_samples, n_features) = x.shape();
        if let Some(weights) = sample_weight {
            validation::check_sample_weight(weights, n_samples)?;
        }
        self.check_hyperparameters()?;

        let max_samples = resolve_subset_size(subset_of_max_samples(self.max_samples), n_samples);
        let n_sub_features =
            resolve_subset_size(subset_of_max_features(self.max_features), n_features);
        let max_depth = depth_cap(max_samples);

        // Seeds are drawn up front so tree construction can run in
        // parallel while staying reproducible under a fixed random_state.
        let seeds: Vec<u64> = match self.random_state {
            Some(base) => (0..self.n_estimators).map(|i| base + i as u64).collect(),
            None => {
                let mut rng = rand::thread_rng();
                (0..self.n_estimators).map(|_| rng.gen()).collect()
            }
        };

        let bootstrap = self.bootstrap;
        let build_one = |&seed: &u64| -> Result<(IsoTree, Vec<usize>)> {
            let mut rng = StdRng::seed_from_u64(seed);
            let in_bag =
                draw_sub_sample(n_samples, max_samples, bootstrap, sample_weight, &mut rng)?;
            let features = draw_feature_subset(n_features, n_sub_features, &mut rng);
            let tree = IsoTree::build(x, &in_bag, &features, max_depth, &mut rng);
            Ok((tree, in_bag))
        };

        #[cfg(feature = "parallel")]
        let built: Result<Vec<(IsoTree, Vec<usize>)>> = seeds.par_iter().map(build_one).collect();

        #[cfg(not(feature = "parallel"))]
        let built: Result<Vec<(IsoTree, Vec<usize>)>> = seeds.iter().map(build_one).collect();

        let (trees, in_bag_indices) = built?.into_iter().unzip();

        self.trees = trees;
        self.in_bag_indices = in_bag_indices;
        self.n_features_in = Some(n_features);
        self.effective_max_samples = Some(max_samples);
        Ok(())
    }

    /// Scores dense samples; one value in (0, 1] per row, larger meaning
    /// more anomalous.
    ///
    /// Per-tree depth computation is independent and runs in parallel when
    /// the `parallel` feature is enabled; the mean reduction joins all
    /// per-tree results.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted, on non-finite input, or on a feature
    /// count differing from fit time. The ensemble is never mutated.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let n_features_in = self
            .n_features_in
            .ok_or_else(|| AislarError::not_fitted("IsolationForest"))?;
        let max_samples = self
            .effective_max_samples
            .ok_or_else(|| AislarError::not_fitted("IsolationForest"))?;
        validation::check_matrix(x, "IsolationForest::predict")?;
        validation::check_feature_count(n_features_in, x.n_cols())?;

        let n_samples = x.n_rows();

        #[cfg(feature = "parallel")]
        let per_tree: Vec<Vec<f32>> = self
            .trees
            .par_iter()
            .map(|tree| apply_tree(tree, x))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let per_tree: Vec<Vec<f32>> = self.trees.iter().map(|tree| apply_tree(tree, x)).collect();

        let mut mean_depth = vec![0.0_f32; n_samples];
        for depths in &per_tree {
            for (acc, &d) in mean_depth.iter_mut().zip(depths.iter()) {
                *acc += d;
            }
        }
        let n_trees = self.trees.len() as f32;
        let normalizer = average_path_length(max_samples);

        let scores: Vec<f32> = mean_depth
            .iter()
            .map(|&total| 2.0_f32.powf(-(total / n_trees) / normalizer))
            .collect();
        Ok(Vector::from_vec(scores))
    }

    /// Scores compressed-row sparse samples.
    ///
    /// # Errors
    ///
    /// Returns [`AislarError::UnsupportedSparseLayout`] for a non-CSR
    /// payload, plus the failure modes of [`IsolationForest::predict`].
    pub fn predict_sparse(&self, x: &SparseMatrix) -> Result<Vector<f32>> {
        let dense = validation::check_sparse(x, &[SparseFormat::Csr], "IsolationForest::predict")?;
        self.predict(&dense)
    }

    /// Scores with the sign flipped: larger values mean more normal.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`IsolationForest::predict`].
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        Ok(self.predict(x)?.scale(-1.0))
    }

    /// Out-of-bag scoring is not meaningful for isolation forests: there is
    /// no held-out target to evaluate against.
    ///
    /// # Errors
    ///
    /// Always returns [`AislarError::UnsupportedOperation`].
    pub fn oob_score(&self) -> Result<f32> {
        Err(AislarError::unsupported_operation(
            "oob_score",
            "isolation forests have no out-of-bag target to score against",
        ))
    }

    fn check_hyperparameters(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(AislarError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        check_subset_param("max_samples", subset_of_max_samples(self.max_samples))?;
        check_subset_param("max_features", subset_of_max_features(self.max_features))?;
        Ok(())
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector for IsolationForest {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        IsolationForest::fit(self, x)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        IsolationForest::predict(self, x)
    }

    fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        IsolationForest::decision_function(self, x)
    }
}

/// Unified count-or-fraction shape shared by the two subset knobs.
#[derive(Debug, Clone, Copy)]
enum SubsetSize {
    Count(usize),
    Fraction(f32),
}

fn subset_of_max_samples(m: MaxSamples) -> SubsetSize {
    match m {
        MaxSamples::Count(c) => SubsetSize::Count(c),
        MaxSamples::Fraction(f) => SubsetSize::Fraction(f),
    }
}

fn subset_of_max_features(m: MaxFeatures) -> SubsetSize {
    match m {
        MaxFeatures::Count(c) => SubsetSize::Count(c),
        MaxFeatures::Fraction(f) => SubsetSize::Fraction(f),
    }
}

fn check_subset_param(param: &str, size: SubsetSize) -> Result<()> {
    match size {
        SubsetSize::Count(0) => Err(AislarError::InvalidHyperparameter {
            param: param.to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        }),
        SubsetSize::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
            Err(AislarError::InvalidHyperparameter {
                param: param.to_string(),
                value: format!("{f}"),
                constraint: "fraction in (0, 1]".to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Resolves a count-or-fraction knob against the available total, clamping
/// counts into `[1, total]`.
fn resolve_subset_size(size: SubsetSize, total: usize) -> usize {
    let resolved = match size {
        SubsetSize::Count(c) => c,
        SubsetSize::Fraction(f) => ((f as f64 * total as f64).round() as usize).max(1),
    };
    resolved.clamp(1, total)
}

/// Depth cap for trees built over `max_samples` rows.
fn depth_cap(max_samples: usize) -> usize {
    (max_samples.max(2) as f32).log2().ceil() as usize
}

/// Draws one tree's in-bag index set.
fn draw_sub_sample(
    n_samples: usize,
    size: usize,
    bootstrap: bool,
    sample_weight: Option<&[f32]>,
    rng: &mut StdRng,
) -> Result<Vec<usize>> {
    match (bootstrap, sample_weight) {
        (true, None) => {
            let dist = Uniform::from(0..n_samples);
            Ok((0..size).map(|_| dist.sample(rng)).collect())
        }
        (true, Some(weights)) => {
            let dist = WeightedIndex::new(weights.iter().copied()).map_err(|e| {
                AislarError::InvalidInput {
                    message: format!("sample_weight rejected: {e}"),
                }
            })?;
            Ok((0..size).map(|_| dist.sample(rng)).collect())
        }
        (false, None) => {
            // Partial Fisher-Yates: the first `size` slots end up holding a
            // uniform draw without replacement.
            let mut indices: Vec<usize> = (0..n_samples).collect();
            for i in 0..size {
                let j = rng.gen_range(i..n_samples);
                indices.swap(i, j);
            }
            indices.truncate(size);
            Ok(indices)
        }
        (false, Some(weights)) => {
            let indices: Vec<usize> = (0..n_samples).collect();
            let chosen = indices
                .choose_multiple_weighted(rng, size, |&i| weights[i])
                .map_err(|e| AislarError::InvalidInput {
                    message: format!("sample_weight rejected: {e}"),
                })?;
            Ok(chosen.copied().collect())
        }
    }
}

/// Draws one tree's feature subset without replacement.
fn draw_feature_subset(n_features: usize, size: usize, rng: &mut StdRng) -> Vec<usize> {
    if size >= n_features {
        return (0..n_features).collect();
    }
    let features: Vec<usize> = (0..n_features).collect();
    let mut subset: Vec<usize> = features.choose_multiple(rng, size).copied().collect();
    subset.sort_unstable();
    subset
}

/// Isolation depths of every row of `x` under one tree.
fn apply_tree(tree: &IsoTree, x: &Matrix<f32>) -> Vec<f32> {
    (0..x.n_rows())
        .map(|i| tree.apply(x.row_slice(i)))
        .collect()
}


#[cfg(test)]
#[path = "tests_iforest_contract.rs"]
mod tests_iforest_contract;
