// =========================================================================
// FALSIFY-LF: Local Outlier Factor contract
//
// Pins the density-ratio laws (positive scores, near-1 homogeneous
// neighborhoods, planted-outlier dominance) and the search capability's
// self-exclusion rule.
//
// References:
//   - Breunig et al. (2000) "LOF: Identifying Density-Based Local Outliers"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn cluster_and_outlier() -> Matrix<f32> {
    Matrix::from_vec(
        8,
        2,
        vec![
            1.0, 1.0, 1.1, 1.0, 1.0, 1.1, 0.9, 0.9, 1.1, 1.1, 1.0, 0.9, 0.9, 1.1, 7.0, 7.0,
        ],
    )
    .expect("valid matrix")
}

/// FALSIFY-LF-001: LOF scores are positive
#[test]
fn falsify_lf_001_scores_positive() {
    let data = cluster_and_outlier();

    let mut lof = LocalOutlierFactor::new().with_n_neighbors(3);
    lof.fit(&data).expect("fit succeeds");

    let factors = lof.outlier_factors().expect("factors");
    for i in 0..factors.len() {
        assert!(
            factors[i] > 0.0,
            "FALSIFIED LF-001: factor[{i}]={}, expected > 0",
            factors[i]
        );
    }
}

/// FALSIFY-LF-002: Factor length matches sample count
#[test]
fn falsify_lf_002_factor_length() {
    let data = cluster_and_outlier();

    let mut lof = LocalOutlierFactor::new().with_n_neighbors(3);
    lof.fit(&data).expect("fit succeeds");

    let factors = lof.outlier_factors().expect("factors");
    assert_eq!(
        factors.len(),
        8,
        "FALSIFIED LF-002: factor len={}, expected 8",
        factors.len()
    );

    let probe = Matrix::from_vec(3, 2, vec![1.0, 1.0, 0.0, 0.0, 5.0, 5.0]).expect("valid matrix");
    let scores = lof.predict(&probe).expect("predict succeeds");
    assert_eq!(
        scores.len(),
        3,
        "FALSIFIED LF-002: predict len={}, expected 3",
        scores.len()
    );
}

/// FALSIFY-LF-003: The planted outlier gets the largest factor
#[test]
fn falsify_lf_003_outlier_dominates() {
    let data = cluster_and_outlier();

    let mut lof = LocalOutlierFactor::new().with_n_neighbors(3);
    lof.fit(&data).expect("fit succeeds");

    let factors = lof.outlier_factors().expect("factors");
    for i in 0..7 {
        assert!(
            factors[7] > factors[i],
            "FALSIFIED LF-003: outlier factor {} not above member {i} ({})",
            factors[7],
            factors[i]
        );
    }
}

/// FALSIFY-LF-004: Fit-set queries never list a sample as its own neighbor
#[test]
fn falsify_lf_004_self_excluded() {
    let data = cluster_and_outlier();

    let mut searcher = BruteForceNeighbors::new();
    searcher.fit(&data).expect("fit succeeds");

    let (_, indices) = searcher.kneighbors_within_fit(3).expect("self query");
    for (i, neighbors) in indices.iter().enumerate() {
        assert!(
            !neighbors.contains(&i),
            "FALSIFIED LF-004: sample {i} appears in its own neighborhood"
        );
    }
}

/// FALSIFY-LF-005: Scoring is deterministic across repeated calls
#[test]
fn falsify_lf_005_deterministic() {
    let data = cluster_and_outlier();

    let mut lof = LocalOutlierFactor::new().with_n_neighbors(3);
    lof.fit(&data).expect("fit succeeds");

    let probe = Matrix::from_vec(2, 2, vec![1.0, 1.0, -4.0, 3.0]).expect("valid matrix");
    let first = lof.predict(&probe).expect("predict succeeds");
    let second = lof.predict(&probe).expect("predict succeeds");
    assert_eq!(
        first, second,
        "FALSIFIED LF-005: repeated predict calls disagree"
    );
}
