// =========================================================================
// FALSIFY-ME: Detector evaluation metrics contract
//
// Pins the Mann-Whitney ROC AUC laws (bounds, complement symmetry) and
// the precision-recall curve shape the detectors are judged with.
//
// References:
//   - Hanley & McNeil (1982) "The meaning and use of the area under a
//     receiver operating characteristic (ROC) curve"
// =========================================================================

use super::*;

/// FALSIFY-ME-001: ROC AUC is in [0, 1]
#[test]
fn falsify_me_001_auc_bounded() {
    let y_score = [0.3, 0.1, 0.5, 0.9, 0.7, 0.2];
    let y_true = [1, 0, 0, 1, 1, 0];

    let auc = roc_auc_score(&y_score, &y_true);
    assert!(
        (0.0..=1.0).contains(&auc),
        "FALSIFIED ME-001: auc={auc}, expected in [0,1]"
    );
}

/// FALSIFY-ME-002: Perfect ranking scores AUC = 1
#[test]
fn falsify_me_002_perfect_ranking() {
    let y_score = [0.1, 0.2, 0.3, 0.7, 0.8, 0.9];
    let y_true = [0, 0, 0, 1, 1, 1];

    let auc = roc_auc_score(&y_score, &y_true);
    assert!(
        (auc - 1.0).abs() < 1e-6,
        "FALSIFIED ME-002: auc={auc}, expected 1.0"
    );
}

/// FALSIFY-ME-003: Complementing the labels complements the AUC
#[test]
fn falsify_me_003_complement_symmetry() {
    let y_score = [0.3, 0.1, 0.5, 0.9, 0.7, 0.2];
    let y_true = [1, 0, 0, 1, 1, 0];
    let flipped: Vec<usize> = y_true.iter().map(|&t| 1 - t).collect();

    let auc = roc_auc_score(&y_score, &y_true);
    let auc_flipped = roc_auc_score(&y_score, &flipped);
    assert!(
        (auc + auc_flipped - 1.0).abs() < 1e-5,
        "FALSIFIED ME-003: auc={auc} + flipped={auc_flipped} != 1"
    );
}

/// FALSIFY-ME-004: Precision and recall values are in [0, 1]
#[test]
fn falsify_me_004_pr_values_bounded() {
    let y_score = [0.3, 0.1, 0.5, 0.9, 0.7, 0.2];
    let y_true = [1, 0, 0, 1, 1, 0];

    let (precision, recall, _) = precision_recall_curve(&y_score, &y_true);
    for (i, (&p, &r)) in precision.iter().zip(recall.iter()).enumerate() {
        assert!(
            (0.0..=1.0).contains(&p) && (0.0..=1.0).contains(&r),
            "FALSIFIED ME-004: point {i} (p={p}, r={r}) out of the unit square"
        );
    }
}

/// FALSIFY-ME-005: Trapezoid area of the unit ramp is one half
#[test]
fn falsify_me_005_trapezoid_ramp() {
    let x: Vec<f32> = (0..=10).map(|i| i as f32 / 10.0).collect();
    let y = x.clone();
    let area = auc(&x, &y);
    assert!(
        (area - 0.5).abs() < 1e-5,
        "FALSIFIED ME-005: ramp area={area}, expected 0.5"
    );
}

mod metrics_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-ME-001-prop: ROC AUC bounded for random scores and labels
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn falsify_me_001_prop_auc_bounded(
            n in 4..=24usize,
            seed in 0..500u32,
        ) {
            let y_score: Vec<f32> = (0..n)
                .map(|i| ((i as f32 + seed as f32) * 0.53).sin())
                .collect();
            let y_true: Vec<usize> = (0..n).map(|i| (i + seed as usize) % 2).collect();

            let auc = roc_auc_score(&y_score, &y_true);
            prop_assert!(
                (0.0..=1.0).contains(&auc),
                "FALSIFIED ME-001-prop: auc={} not in [0,1]",
                auc
            );
        }
    }

    /// FALSIFY-ME-003-prop: Complement symmetry for random inputs
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn falsify_me_003_prop_complement(
            n in 4..=24usize,
            seed in 0..500u32,
        ) {
            let y_score: Vec<f32> = (0..n)
                .map(|i| ((i as f32 + seed as f32) * 0.53).sin())
                .collect();
            let y_true: Vec<usize> = (0..n).map(|i| (i + seed as usize) % 2).collect();
            let flipped: Vec<usize> = y_true.iter().map(|&t| 1 - t).collect();

            let auc = roc_auc_score(&y_score, &y_true);
            let auc_flipped = roc_auc_score(&y_score, &flipped);
            prop_assert!(
                (auc + auc_flipped - 1.0).abs() < 1e-4,
                "FALSIFIED ME-003-prop: {} + {} != 1",
                auc, auc_flipped
            );
        }
    }
}
