// =========================================================================
// FALSIFY-IF: Isolation Forest contract
//
// Pins the score convention (raw anomaly scores in (0, 1], negated
// decision values in [-1, 0)), the path-length normalizer, and
// seed-level reproducibility.
//
// References:
//   - Liu, Ting, Zhou (2008) "Isolation Forest"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn tight_cluster(n: usize) -> Matrix<f32> {
    let data: Vec<f32> = (0..n * 2)
        .map(|i| 1.0 + ((i as f32) * 0.61).sin() * 0.1)
        .collect();
    Matrix::from_vec(n, 2, data).expect("valid matrix")
}

/// FALSIFY-IF-001: Anomaly scores are in (0, 1]
#[test]
fn falsify_if_001_scores_bounded() {
    let data = tight_cluster(8);

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42);
    forest.fit(&data).expect("fit succeeds");

    let scores = forest.predict(&data).expect("predict succeeds");
    for i in 0..scores.len() {
        assert!(
            scores[i] > 0.0 && scores[i] <= 1.0,
            "FALSIFIED IF-001: score[{i}]={}, expected in (0,1]",
            scores[i]
        );
    }
}

/// FALSIFY-IF-002: Decision values are negated scores, in [-1, 0)
#[test]
fn falsify_if_002_decision_negated() {
    let data = tight_cluster(8);

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42);
    forest.fit(&data).expect("fit succeeds");

    let scores = forest.predict(&data).expect("predict succeeds");
    let decisions = forest.decision_function(&data).expect("decision succeeds");
    for i in 0..scores.len() {
        assert!(
            (decisions[i] + scores[i]).abs() < 1e-6,
            "FALSIFIED IF-002: decision[{i}]={} != -score {}",
            decisions[i],
            scores[i]
        );
        assert!(
            decisions[i] >= -1.0 && decisions[i] < 0.0,
            "FALSIFIED IF-002: decision[{i}]={} outside [-1,0)",
            decisions[i]
        );
    }
}

/// FALSIFY-IF-003: Score length matches sample count
#[test]
fn falsify_if_003_score_length() {
    let data = tight_cluster(10);

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42);
    forest.fit(&data).expect("fit succeeds");

    let scores = forest.predict(&data).expect("predict succeeds");
    assert_eq!(
        scores.len(),
        10,
        "FALSIFIED IF-003: scores len={}, expected 10",
        scores.len()
    );
}

/// FALSIFY-IF-004: Path-length normalizer matches the closed form
#[test]
fn falsify_if_004_normalizer_closed_form() {
    for n in [2usize, 10, 100, 256] {
        let nf = n as f32;
        let expected = 2.0 * (nf.ln() + EULER_GAMMA) - 2.0 * (nf - 1.0) / nf;
        let got = average_path_length(n);
        assert!(
            (got - expected).abs() < 1e-5,
            "FALSIFIED IF-004: c({n})={got}, expected {expected}"
        );
    }
    assert!(
        (average_path_length(0) - 1.0).abs() < 1e-6 && (average_path_length(1) - 1.0).abs() < 1e-6,
        "FALSIFIED IF-004: c(0) and c(1) must be 1"
    );
}

/// FALSIFY-IF-005: Identical seeds produce identical scores
#[test]
fn falsify_if_005_seed_reproducibility() {
    let data = tight_cluster(12);

    let mut a = IsolationForest::new()
        .with_n_estimators(30)
        .with_random_state(7);
    let mut b = IsolationForest::new()
        .with_n_estimators(30)
        .with_random_state(7);
    a.fit(&data).expect("fit a");
    b.fit(&data).expect("fit b");

    let sa = a.predict(&data).expect("predict a");
    let sb = b.predict(&data).expect("predict b");
    assert_eq!(sa, sb, "FALSIFIED IF-005: same seed, different scores");
}

mod iforest_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-IF-001-prop: Anomaly scores in (0, 1] for random data
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_if_001_prop_scores_bounded(
            n in 8..=20usize,
            seed in 0..200u32,
        ) {
            let data: Vec<f32> = (0..n * 2)
                .map(|i| ((i as f32 + seed as f32) * 0.37).sin() * 10.0)
                .collect();
            let matrix = Matrix::from_vec(n, 2, data).expect("valid");
            let mut forest = IsolationForest::new()
                .with_n_estimators(50)
                .with_random_state(seed as u64);
            forest.fit(&matrix).expect("fit");

            let scores = forest.predict(&matrix).expect("predict");
            for i in 0..scores.len() {
                prop_assert!(
                    scores[i] > 0.0 && scores[i] <= 1.0,
                    "FALSIFIED IF-001-prop: score[{}]={} not in (0,1]",
                    i, scores[i]
                );
            }
        }
    }

    /// FALSIFY-IF-003-prop: Score length matches sample count
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_if_003_prop_score_length(
            n in 8..=20usize,
            seed in 0..200u32,
        ) {
            let data: Vec<f32> = (0..n * 2)
                .map(|i| ((i as f32 + seed as f32) * 0.37).sin() * 10.0)
                .collect();
            let matrix = Matrix::from_vec(n, 2, data).expect("valid");
            let mut forest = IsolationForest::new()
                .with_n_estimators(50)
                .with_random_state(seed as u64);
            forest.fit(&matrix).expect("fit");

            let scores = forest.predict(&matrix).expect("predict");
            prop_assert_eq!(
                scores.len(),
                n,
                "FALSIFIED IF-003-prop: scores len {} != {}",
                scores.len(), n
            );
        }
    }
}
