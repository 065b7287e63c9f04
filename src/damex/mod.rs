//! DAMEX extreme-value anomaly detection.
//!
//! DAMEX (Detecting Anomalies among Multivariate EXtremes) learns which
//! groups of features tend to be large *together* in the tail of the
//! training distribution. Each marginal is rank-transformed onto a common
//! standard Pareto scale; samples whose infinity norm clears an extreme
//! threshold are assigned to a *face* — the subset of coordinates at or
//! above a fraction of the norm — and an empirical angular measure `mu`
//! accumulates mass per face. A new extreme sample is anomalous when its
//! face carries little or no learned mass.
//!
//! The detector only learns in the extreme region: samples below the
//! threshold are not represented in `mu`, and scoring them falls back to a
//! degraded constant (see [`Damex::predict_with_diagnostics`]).
//!
//! # Algorithm
//!
//! 1. `order`: store each feature's sorted training column `R`.
//! 2. `transform`: map coordinate `x_i` to `1 / (1 - rank)` with
//!    `rank = insertion_position(R_i, x_i) / (n + 1)` — standard Pareto
//!    marginals, never exactly 0 or 1.
//! 3. `fit`: with `k = n_thresh^k_pow` and
//!    `threshold_extreme = n_thresh / k`, keep samples whose infinity norm
//!    exceeds the threshold, assign each to its face, add `1/k` mass per
//!    sample, then prune weak faces twice.
//! 4. `predict`: re-transform, look the face up in `mu`, and return
//!    `2 - mass/norm` (or `2 - mass` without norm weighting); faces never
//!    seen score `2 - 0`.
//!
//! # References
//!
//! - Goix, Sabourin & Clémençon (2016) "Sparse representation of
//!   multivariate extremes with applications to anomaly ranking", AISTATS.
//! - Goix, Sabourin & Clémençon (2017) "Sparse representation of
//!   multivariate extremes with applications to anomaly detection", JMVA.

mod face;

pub use face::Face;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AislarError, Result};
use crate::metrics;
use crate::primitives::{Matrix, Vector};
use crate::traits::AnomalyDetector;
use crate::validation;

/// Per-batch scoring diagnostics.
///
/// Non-extreme samples degrade to a fallback score instead of failing;
/// this struct reports how much of a batch that affected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringDiagnostics {
    /// Samples whose transformed infinity norm fell below the extreme
    /// threshold; the detector never learned on such data.
    pub n_non_extreme: usize,
    /// Fraction of the batch whose face carried learned mass.
    pub mass_hit_ratio: f32,
}

/// DAMEX angular-measure detector.
///
/// Scores are `2 - mass`-shaped: lower means more normal, and anything at
/// or above 2 saw no learned mass at all.
///
/// # Examples
///
/// ```
/// use aislar::damex::Damex;
/// use aislar::primitives::Matrix;
///
/// // Two features that are always large together.
/// let data = Matrix::from_vec(8, 2, vec![
///     1.0, 1.1, 2.0, 2.1, 3.0, 3.2, 4.0, 4.1,
///     5.0, 5.3, 6.0, 6.2, 7.0, 7.1, 8.0, 8.2,
/// ]).unwrap();
///
/// let mut damex = Damex::new().with_epsilon(0.1);
/// damex.fit(&data).unwrap();
/// assert!(damex.is_fitted());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Damex {
    epsilon: f32,
    k_pow: f32,
    n_threshold_extreme: Option<usize>,
    pruning_faces_coef: f32,
    with_rectangles: bool,
    with_norm: bool,
    with_transform: bool,
    mu: HashMap<Face, f32>,
    order_stats: Vec<Vec<f32>>,
    threshold_extreme: Option<f32>,
    n_features_in: Option<usize>,
}

impl Damex {
    /// Creates a detector with default hyperparameters: `epsilon = 0.01`,
    /// `k_pow = 0.5`, `pruning_faces_coef = 0.1`, epsilon-thickened cones,
    /// norm-weighted scoring, Pareto rank transformation on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epsilon: 0.01,
            k_pow: 0.5,
            n_threshold_extreme: None,
            pruning_faces_coef: 0.1,
            with_rectangles: false,
            with_norm: true,
            with_transform: true,
            mu: HashMap::new(),
            order_stats: Vec::new(),
            threshold_extreme: None,
            n_features_in: None,
        }
    }

    /// Sets the face-width tolerance. A coordinate counts as "large" when
    /// it reaches `epsilon` times the sample's norm (cones) or the extreme
    /// threshold (rectangles).
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the extremal exponent: the effective extreme-sample budget is
    /// `k = n_thresh^k_pow`. `k_pow = 1` learns on every sample.
    #[must_use]
    pub fn with_k_pow(mut self, k_pow: f32) -> Self {
        self.k_pow = k_pow;
        self
    }

    /// Overrides the sample budget `n_thresh` used to derive `k` and the
    /// extreme threshold. Defaults to the training-set size at fit.
    #[must_use]
    pub fn with_n_threshold_extreme(mut self, n: usize) -> Self {
        self.n_threshold_extreme = Some(n);
        self
    }

    /// Sets the face-pruning coefficient: faces with mass below
    /// `coef * mean(mass)` are dropped. Zero keeps every observed face.
    #[must_use]
    pub fn with_pruning_faces_coef(mut self, coef: f32) -> Self {
        self.pruning_faces_coef = coef;
        self
    }

    /// Selects epsilon-thickened rectangles instead of cones as the face
    /// criterion.
    #[must_use]
    pub fn with_rectangles(mut self, with_rectangles: bool) -> Self {
        self.with_rectangles = with_rectangles;
        self
    }

    /// Selects norm-weighted scoring (`mass / norm`, default) or bare
    /// angular mass.
    #[must_use]
    pub fn with_norm(mut self, with_norm: bool) -> Self {
        self.with_norm = with_norm;
        self
    }

    /// Disables the Pareto rank transformation; the caller then supplies
    /// data already on a standard heavy-tailed scale. The theory behind
    /// the estimator assumes the standard transformation.
    #[must_use]
    pub fn with_transform(mut self, with_transform: bool) -> Self {
        self.with_transform = with_transform;
        self
    }

    /// Returns true once the angular measure has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.n_features_in.is_some()
    }

    /// Feature count seen at fit time, if fitted.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features_in
    }

    /// The extreme threshold derived at fit time, if fitted.
    #[must_use]
    pub fn threshold_extreme(&self) -> Option<f32> {
        self.threshold_extreme
    }

    /// The fitted angular measure: mass per face.
    #[must_use]
    pub fn mu(&self) -> &HashMap<Face, f32> {
        &self.mu
    }

    /// Learns the angular measure.
    ///
    /// Refitting re-derives and replaces all learned state; nothing is
    /// mutated on failure.
    ///
    /// # Errors
    ///
    /// Returns an error on empty or non-finite input, or on invalid
    /// hyperparameters.
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        validation::check_matrix(x, "Damex::fit")?;
        self.check_hyperparameters()?;
        let (n_samples, n_features) = x.shape();

        let n_thresh = self.n_threshold_extreme.unwrap_or(n_samples);
        let k = (n_thresh as f32).powf(self.k_pow);
        let threshold_extreme = n_thresh as f32 / k;

        let order_stats = if self.with_transform {
            build_order_stats(x)
        } else {
            Vec::new()
        };
        let data = if self.with_transform {
            transform_with(&order_stats, x)?
        } else {
            x.clone()
        };

        let mass_increment = 1.0 / k;
        let mut mu: HashMap<Face, f32> = HashMap::new();
        for i in 0..n_samples {
            let row = data.row_slice(i);
            let norm = infinity_norm(row);
            if norm > threshold_extreme {
                let face = self.face_of(row, norm, threshold_extreme);
                *mu.entry(face).or_insert(0.0) += mass_increment;
            }
        }

        threshold_faces(&mut mu, self.pruning_faces_coef);
        // Second pass is deliberate: the first prune lowers the mean, so
        // another round of weak faces falls below the bar.
        threshold_faces(&mut mu, self.pruning_faces_coef);

        self.mu = mu;
        self.order_stats = order_stats;
        self.threshold_extreme = Some(threshold_extreme);
        self.n_features_in = Some(n_features);
        Ok(())
    }

    /// Maps samples onto the standard Pareto scale learned at fit time.
    ///
    /// Coordinate `i` becomes `(n + 1) / (n + 1 - count)` where `count` is
    /// the number of stored training values strictly below it; the result
    /// grows without bound as a value moves past the training maximum.
    /// Monotone non-decreasing in every coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted (or fitted with the transformation
    /// disabled), on non-finite input, or on feature-count mismatch.
    pub fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let n_features_in = self
            .n_features_in
            .ok_or_else(|| AislarError::not_fitted("Damex"))?;
        if self.order_stats.is_empty() {
            return Err(AislarError::unsupported_operation(
                "transform",
                "fitted with with_transform = false, no order statistics stored",
            ));
        }
        validation::check_matrix(x, "Damex::transform")?;
        validation::check_feature_count(n_features_in, x.n_cols())?;
        transform_with(&self.order_stats, x)
    }

    /// Scores samples and reports how many fell outside the learned
    /// extreme region.
    ///
    /// Per sample: transform, take the infinity norm, and
    /// - below the extreme threshold: count it as non-extreme and leave
    ///   the raw score at 0 (without norm weighting, a sub-unit norm first
    ///   forces the raw score to 1 — a historical special case);
    /// - otherwise look its face up in `mu`: raw score is `mass / norm`
    ///   (norm-weighted) or `mass`, and 0 when the face carries no mass.
    ///
    /// Every returned value is `2 - raw`, so lower means more normal and
    /// values at or above 2 saw no learned mass.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted, on non-finite input, or on
    /// feature-count mismatch. Non-extreme samples are not an error.
    pub fn predict_with_diagnostics(
        &self,
        x: &Matrix<f32>,
    ) -> Result<(Vector<f32>, ScoringDiagnostics)> {
        let n_features_in = self
            .n_features_in
            .ok_or_else(|| AislarError::not_fitted("Damex"))?;
        let threshold_extreme = self
            .threshold_extreme
            .ok_or_else(|| AislarError::not_fitted("Damex"))?;
        validation::check_matrix(x, "Damex::predict")?;
        validation::check_feature_count(n_features_in, x.n_cols())?;

        let data = if self.with_transform {
            transform_with(&self.order_stats, x)?
        } else {
            x.clone()
        };

        let n_samples = data.n_rows();
        let mut scores = vec![0.0_f32; n_samples];
        let mut n_non_extreme = 0usize;
        let mut n_mass_hits = 0usize;

        for i in 0..n_samples {
            let row = data.row_slice(i);
            let norm = infinity_norm(row);
            if self.with_norm {
                if norm < threshold_extreme {
                    n_non_extreme += 1;
                } else {
                    let face = self.face_of(row, norm, threshold_extreme);
                    scores[i] = match self.mu.get(&face) {
                        Some(&mass) => {
                            n_mass_hits += 1;
                            mass / norm
                        }
                        None => 0.0,
                    };
                }
            } else {
                if norm < 1.0 {
                    scores[i] = 1.0;
                }
                if norm < threshold_extreme {
                    n_non_extreme += 1;
                } else {
                    let face = self.face_of(row, norm, threshold_extreme);
                    scores[i] = match self.mu.get(&face) {
                        Some(&mass) => {
                            n_mass_hits += 1;
                            mass
                        }
                        None => 0.0,
                    };
                }
            }
        }

        for s in &mut scores {
            *s = 2.0 - *s;
        }

        let diagnostics = ScoringDiagnostics {
            n_non_extreme,
            mass_hit_ratio: n_mass_hits as f32 / n_samples as f32,
        };
        Ok((Vector::from_vec(scores), diagnostics))
    }

    /// Scores samples; lower means more normal.
    ///
    /// Emits a diagnostic on stderr when the batch contains samples below
    /// the extreme threshold — the detector never learned on such data and
    /// scores them by fallback. See [`Damex::predict_with_diagnostics`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Damex::predict_with_diagnostics`].
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let (scores, diagnostics) = self.predict_with_diagnostics(x)?;
        if diagnostics.n_non_extreme > 0 {
            eprintln!(
                "Damex: {} of {} samples fall below the extreme threshold and were scored by \
                 fallback (learned-mass hit ratio {:.3}); consider k_pow = 1 to learn on every \
                 sample",
                diagnostics.n_non_extreme,
                scores.len(),
                diagnostics.mass_hit_ratio
            );
        }
        Ok(scores)
    }

    /// Identical to [`Damex::predict`]: DAMEX scores already rank lower =
    /// more normal, so no sign flip is applied.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Damex::predict`].
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        self.predict(x)
    }

    /// ROC AUC of the anomaly scores against binary ground truth
    /// (1 = anomaly).
    ///
    /// # Errors
    ///
    /// Returns an error if `y_true` and the score vector disagree in
    /// length, plus the failure modes of [`Damex::predict`].
    pub fn score(&self, x: &Matrix<f32>, y_true: &[usize]) -> Result<f32> {
        let scores = self.predict(x)?;
        if y_true.len() != scores.len() {
            return Err(AislarError::dimension_mismatch(
                "y_true length",
                scores.len(),
                y_true.len(),
            ));
        }
        Ok(metrics::roc_auc_score(scores.as_slice(), y_true))
    }

    /// Assigns an extreme sample to its face: coordinate `i` is on when it
    /// reaches `epsilon` times the norm (cones) or the threshold
    /// (rectangles).
    fn face_of(&self, row: &[f32], norm: f32, threshold_extreme: f32) -> Face {
        let cut = if self.with_rectangles {
            self.epsilon * threshold_extreme
        } else {
            self.epsilon * norm
        };
        Face::from_fn(row.len(), |i| row[i] >= cut)
    }

    fn check_hyperparameters(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(AislarError::InvalidHyperparameter {
                param: "epsilon".to_string(),
                value: format!("{}", self.epsilon),
                constraint: "in (0, 1)".to_string(),
            });
        }
        if !(self.k_pow > 0.0 && self.k_pow <= 1.0) {
            return Err(AislarError::InvalidHyperparameter {
                param: "k_pow".to_string(),
                value: format!("{}", self.k_pow),
                constraint: "in (0, 1]".to_string(),
            });
        }
        if !(self.pruning_faces_coef >= 0.0 && self.pruning_faces_coef < 1.0) {
            return Err(AislarError::InvalidHyperparameter {
                param: "pruning_faces_coef".to_string(),
                value: format!("{}", self.pruning_faces_coef),
                constraint: "in [0, 1)".to_string(),
            });
        }
        if self.n_threshold_extreme == Some(0) {
            return Err(AislarError::InvalidHyperparameter {
                param: "n_threshold_extreme".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Damex {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector for Damex {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        Damex::fit(self, x)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        Damex::predict(self, x)
    }

    // Overrides the negating default: DAMEX's convention is already
    // lower = more normal.
    fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        Damex::decision_function(self, x)
    }
}

/// Per-feature sorted training columns.
fn build_order_stats(x: &Matrix<f32>) -> Vec<Vec<f32>> {
    let (_, n_features) = x.shape();
    (0..n_features)
        .map(|j| {
            let mut column = x.column(j).as_slice().to_vec();
            column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            column
        })
        .collect()
}

/// One coordinate of the Pareto transform.
///
/// `count` values below `v` among `n` stored ones give rank
/// `count / (n + 1)` and value `1 / (1 - rank)`; the integer form avoids
/// cancellation at extreme ranks.
fn pareto_value(sorted_column: &[f32], v: f32) -> f32 {
    let n = sorted_column.len();
    let count = sorted_column.partition_point(|&c| c < v);
    (n + 1) as f32 / (n + 1 - count) as f32
}

fn transform_with(order_stats: &[Vec<f32>], x: &Matrix<f32>) -> Result<Matrix<f32>> {
    let (n_samples, n_features) = x.shape();
    let mut data = Vec::with_capacity(n_samples * n_features);
    for i in 0..n_samples {
        let row = x.row_slice(i);
        for j in 0..n_features {
            data.push(pareto_value(&order_stats[j], row[j]));
        }
    }
    Matrix::from_vec(n_samples, n_features, data).map_err(Into::into)
}

fn infinity_norm(row: &[f32]) -> f32 {
    row.iter().fold(0.0_f32, |acc, &v| acc.max(v.abs()))
}

/// Drops every face with mass strictly below `coef * mean(mass)`.
///
/// An empty measure is left untouched. With `coef = 0` every face with
/// positive mass survives unchanged.
fn threshold_faces(mu: &mut HashMap<Face, f32>, coef: f32) {
    if mu.is_empty() {
        return;
    }
    let mean = mu.values().sum::<f32>() / mu.len() as f32;
    mu.retain(|_, mass| *mass >= coef * mean);
}


#[cfg(test)]
#[path = "tests_damex_contract.rs"]
mod tests_damex_contract;
