// =========================================================================
// FALSIFY-DX: DAMEX contract
//
// Pins the `2 - mass` score convention, the Pareto transform's
// monotonicity, the non-extreme fallback path, and the pruning
// coefficient's zero case.
//
// References:
//   - Goix, Sabourin, Clémençon (2016) "Sparse representation of
//     multivariate extremes"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn correlated_tail(n: usize) -> Matrix<f32> {
    let mut data = Vec::with_capacity(n * 2);
    for i in 0..n {
        let v = (i + 1) as f32;
        data.push(v);
        data.push(v * 1.1);
    }
    Matrix::from_vec(n, 2, data).expect("valid matrix")
}

/// FALSIFY-DX-001: Scores never exceed 2 (raw mass is non-negative)
#[test]
fn falsify_dx_001_scores_capped_at_two() {
    let data = correlated_tail(30);
    let mut damex = Damex::new().with_epsilon(0.1);
    damex.fit(&data).expect("fit succeeds");

    let scores = damex.predict(&data).expect("predict succeeds");
    for i in 0..scores.len() {
        assert!(
            scores[i] <= 2.0,
            "FALSIFIED DX-001: score[{i}]={}, expected <= 2",
            scores[i]
        );
    }
}

/// FALSIFY-DX-002: Transform is monotone non-decreasing per coordinate
#[test]
fn falsify_dx_002_transform_monotone() {
    let data = correlated_tail(30);
    let mut damex = Damex::new();
    damex.fit(&data).expect("fit succeeds");

    let probe = Matrix::from_vec(
        5,
        2,
        vec![-10.0, 0.0, 1.0, 0.0, 14.5, 0.0, 29.0, 0.0, 300.0, 0.0],
    )
    .expect("valid matrix");
    let t = damex.transform(&probe).expect("transform succeeds");
    for i in 1..5 {
        assert!(
            t.get(i, 0) >= t.get(i - 1, 0),
            "FALSIFIED DX-002: transform not monotone at row {i}: {} < {}",
            t.get(i, 0),
            t.get(i - 1, 0)
        );
    }
}

/// FALSIFY-DX-003: Score length matches sample count
#[test]
fn falsify_dx_003_score_length() {
    let data = correlated_tail(25);
    let mut damex = Damex::new().with_epsilon(0.1);
    damex.fit(&data).expect("fit succeeds");

    let scores = damex.predict(&data).expect("predict succeeds");
    assert_eq!(
        scores.len(),
        25,
        "FALSIFIED DX-003: scores len={}, expected 25",
        scores.len()
    );
}

/// FALSIFY-DX-004: Pruning with coefficient 0 keeps every observed face
#[test]
fn falsify_dx_004_zero_coef_prunes_nothing() {
    let data = correlated_tail(30);
    let mut unpruned = Damex::new().with_epsilon(0.1).with_pruning_faces_coef(0.0);
    unpruned.fit(&data).expect("fit succeeds");

    let mut reference: HashMap<Face, f32> = HashMap::new();
    let k = 30.0_f32.sqrt();
    let threshold = 30.0 / k;
    let transformed = unpruned.transform(&data).expect("transform succeeds");
    for i in 0..transformed.n_rows() {
        let row = transformed.row_slice(i);
        let norm = infinity_norm(row);
        if norm > threshold {
            let face = Face::from_fn(row.len(), |j| row[j] >= 0.1 * norm);
            *reference.entry(face).or_insert(0.0) += 1.0 / k;
        }
    }

    assert_eq!(
        unpruned.mu().len(),
        reference.len(),
        "FALSIFIED DX-004: coef=0 changed the face set"
    );
    for (face, mass) in &reference {
        let kept = unpruned.mu().get(face).copied().unwrap_or(f32::NAN);
        assert!(
            (kept - mass).abs() < 1e-6,
            "FALSIFIED DX-004: face {face} mass {kept} != {mass}"
        );
    }
}

/// FALSIFY-DX-005: Non-extreme samples score exactly 2 and are counted
#[test]
fn falsify_dx_005_non_extreme_fallback() {
    let data = correlated_tail(30);
    let mut damex = Damex::new().with_epsilon(0.1);
    damex.fit(&data).expect("fit succeeds");

    // Below every training value in both coordinates.
    let probe = Matrix::from_vec(2, 2, vec![-1.0, -1.0, -2.0, -2.0]).expect("valid matrix");
    let (scores, diagnostics) = damex.predict_with_diagnostics(&probe).expect("predict");
    assert_eq!(
        diagnostics.n_non_extreme, 2,
        "FALSIFIED DX-005: counter={}, expected 2",
        diagnostics.n_non_extreme
    );
    for i in 0..scores.len() {
        assert!(
            (scores[i] - 2.0).abs() < 1e-6,
            "FALSIFIED DX-005: fallback score[{i}]={}, expected 2",
            scores[i]
        );
    }
}

mod damex_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-DX-001-prop: Scores capped at 2 for random data
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_dx_001_prop_scores_capped(
            n in 10..=40usize,
            seed in 0..200u32,
        ) {
            let data: Vec<f32> = (0..n * 2)
                .map(|i| ((i as f32 + seed as f32) * 0.73).sin() * 20.0)
                .collect();
            let matrix = Matrix::from_vec(n, 2, data).expect("valid");
            let mut damex = Damex::new().with_epsilon(0.1);
            damex.fit(&matrix).expect("fit");

            let scores = damex.predict(&matrix).expect("predict");
            for i in 0..scores.len() {
                prop_assert!(
                    scores[i] <= 2.0,
                    "FALSIFIED DX-001-prop: score[{}]={} above 2",
                    i, scores[i]
                );
            }
        }
    }

    /// FALSIFY-DX-002-prop: Sorted probes transform to sorted values
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_dx_002_prop_transform_monotone(
            raw in proptest::collection::vec(-100.0_f32..100.0, 4..16),
            seed in 0..100u32,
        ) {
            let n = 20;
            let data: Vec<f32> = (0..n)
                .map(|i| ((i as f32 + seed as f32) * 0.37).sin() * 50.0)
                .collect();
            let matrix = Matrix::from_vec(n, 1, data).expect("valid");
            let mut damex = Damex::new();
            damex.fit(&matrix).expect("fit");

            let mut sorted = raw.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
            let probe = Matrix::from_vec(sorted.len(), 1, sorted).expect("valid");
            let t = damex.transform(&probe).expect("transform");
            for i in 1..t.n_rows() {
                prop_assert!(
                    t.get(i, 0) >= t.get(i - 1, 0),
                    "FALSIFIED DX-002-prop: row {} transformed below row {}",
                    i, i - 1
                );
            }
        }
    }
}
