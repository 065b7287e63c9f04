//! Evaluation metrics for anomaly detectors.
//!
//! Threshold-free ranking metrics for validating detector output against
//! binary ground truth: ROC AUC in the rank (Mann-Whitney) form, the
//! precision-recall curve, and trapezoidal area under a curve.

use std::cmp::Ordering;

/// Area under the ROC curve of anomaly scores against binary labels.
///
/// Computed in the rank (Mann-Whitney) form with tie-averaged ranks, so no
/// explicit curve is built. Labels are binary: 1 = anomaly (positive),
/// anything else = normal. Returns 0.5 when only one class is present
/// (the curve is undefined).
///
/// # Examples
///
/// ```
/// use aislar::metrics::roc_auc_score;
///
/// let y_score = [0.1, 0.4, 0.35, 0.8];
/// let y_true = [0, 0, 1, 1];
/// let auc = roc_auc_score(&y_score, &y_true);
/// assert!((auc - 0.75).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn roc_auc_score(y_score: &[f32], y_true: &[usize]) -> f32 {
    assert_eq!(y_score.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n_pos = y_true.iter().filter(|&&t| t == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let ranks = tie_averaged_ranks(y_score);
    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t == 1)
        .map(|(_, &r)| r)
        .sum();

    let auc =
        (rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos as f64 * n_neg as f64);
    auc as f32
}

/// Precision-recall pairs at every distinct score threshold.
///
/// Predicting "anomaly" for every score at or above a threshold yields one
/// (precision, recall) point. Thresholds are the distinct score values in
/// increasing order; a final (precision 1, recall 0) point closes the
/// curve so `auc(&recall, &precision)` is well defined.
///
/// Returns `(precision, recall, thresholds)` with
/// `precision.len() == recall.len() == thresholds.len() + 1` and recall
/// non-increasing.
///
/// # Examples
///
/// ```
/// use aislar::metrics::{auc, precision_recall_curve};
///
/// let y_score = [0.1, 0.4, 0.35, 0.8];
/// let y_true = [0, 0, 1, 1];
/// let (precision, recall, thresholds) = precision_recall_curve(&y_score, &y_true);
/// assert_eq!(precision.len(), thresholds.len() + 1);
/// let area = auc(&recall, &precision);
/// assert!(area > 0.5 && area <= 1.0);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn precision_recall_curve(
    y_score: &[f32],
    y_true: &[usize],
) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    assert_eq!(y_score.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n_pos = y_true.iter().filter(|&&t| t == 1).count();

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[b].partial_cmp(&y_score[a]).unwrap_or(Ordering::Equal));

    let mut precision = Vec::new();
    let mut recall = Vec::new();
    let mut thresholds = Vec::new();

    let mut tp = 0usize;
    let mut predicted = 0usize;
    let mut i = 0;
    while i < order.len() {
        let threshold = y_score[order[i]];
        // Tied scores cross the threshold together.
        while i < order.len() && y_score[order[i]] == threshold {
            if y_true[order[i]] == 1 {
                tp += 1;
            }
            predicted += 1;
            i += 1;
        }
        thresholds.push(threshold);
        precision.push(tp as f32 / predicted as f32);
        recall.push(if n_pos == 0 {
            0.0
        } else {
            tp as f32 / n_pos as f32
        });
    }

    precision.reverse();
    recall.reverse();
    thresholds.reverse();
    precision.push(1.0);
    recall.push(0.0);
    (precision, recall, thresholds)
}

/// Area under a curve by the trapezoidal rule.
///
/// `x` must be monotone in either direction; a decreasing `x` integrates
/// the same magnitude with the sign flipped back to positive.
///
/// # Examples
///
/// ```
/// use aislar::metrics::auc;
///
/// // Unit ramp: area of the triangle under y = x.
/// let x = [0.0, 0.5, 1.0];
/// let y = [0.0, 0.5, 1.0];
/// assert!((auc(&x, &y) - 0.5).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths, hold fewer than two
/// points, or `x` is not monotone.
#[must_use]
pub fn auc(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have same length");
    assert!(x.len() >= 2, "AUC requires at least two points");
    let increasing = x.windows(2).all(|w| w[1] >= w[0]);
    let decreasing = x.windows(2).all(|w| w[1] <= w[0]);
    assert!(increasing || decreasing, "x must be monotonic to integrate");

    let mut area = 0.0_f64;
    for i in 1..x.len() {
        area += f64::from(x[i] - x[i - 1]) * f64::from(y[i] + y[i - 1]) / 2.0;
    }
    if increasing {
        area as f32
    } else {
        (-area) as f32
    }
}

/// 1-based ranks of `values`; tied values share the average rank of their
/// run.
fn tie_averaged_ranks(values: &[f32]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}


#[cfg(test)]
#[path = "tests_metrics_contract.rs"]
mod tests_metrics_contract;
