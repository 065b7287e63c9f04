// =========================================================================
// FALSIFY-VE: Vector primitives contract
//
// Score outputs ride on Vector; these laws pin the arithmetic the
// detectors and metrics lean on.
//
// References:
//   - Cauchy-Schwarz inequality: |dot(u,v)| <= norm(u) * norm(v)
// =========================================================================

use super::*;

/// FALSIFY-VE-001: Dot product is commutative: dot(u,v) = dot(v,u)
#[test]
fn falsify_ve_001_dot_commutative() {
    let u = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let v = Vector::from_slice(&[4.0, 5.0, 6.0]);

    let uv = u.dot(&v);
    let vu = v.dot(&u);

    assert!(
        (uv - vu).abs() < 1e-6,
        "FALSIFIED VE-001: dot(u,v)={uv} != dot(v,u)={vu}"
    );
}

/// FALSIFY-VE-002: Norm is non-negative
#[test]
fn falsify_ve_002_norm_nonneg() {
    let v = Vector::from_slice(&[-3.0, 4.0]);
    let n = v.norm();

    assert!(n >= 0.0, "FALSIFIED VE-002: norm={n}, expected >= 0.0");
    assert!(
        (n - 5.0).abs() < 1e-5,
        "FALSIFIED VE-002: norm of [-3,4]={n}, expected 5.0"
    );
}

/// FALSIFY-VE-003: Cauchy-Schwarz: |dot(u,v)| <= norm(u) * norm(v)
#[test]
fn falsify_ve_003_cauchy_schwarz() {
    let u = Vector::from_slice(&[1.0, -2.0, 3.0, 0.5]);
    let v = Vector::from_slice(&[4.0, 0.0, -1.0, 2.0]);

    let dot = u.dot(&v).abs();
    let bound = u.norm() * v.norm();

    assert!(
        dot <= bound + 1e-5,
        "FALSIFIED VE-003: |dot|={dot} > norm(u)*norm(v)={bound}"
    );
}

/// FALSIFY-VE-004: Mean equals sum / length
#[test]
fn falsify_ve_004_mean_equals_sum_over_len() {
    let v = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);

    let mean = v.mean();
    let expected = v.sum() / v.len() as f32;

    assert!(
        (mean - expected).abs() < 1e-6,
        "FALSIFIED VE-004: mean={mean}, expected sum/len={expected}"
    );
    assert!(
        (mean - 6.0).abs() < 1e-6,
        "FALSIFIED VE-004: mean={mean}, expected 6.0"
    );
}

/// FALSIFY-VE-005: Scaling multiplies the sum by the same factor
#[test]
fn falsify_ve_005_scale_distributes_over_sum() {
    let v = Vector::from_slice(&[1.0, -2.0, 3.5]);
    let factor = -1.5;

    let scaled_sum = v.scale(factor).sum();
    let expected = v.sum() * factor;

    assert!(
        (scaled_sum - expected).abs() < 1e-5,
        "FALSIFIED VE-005: sum(scale(v))={scaled_sum}, expected {expected}"
    );
}

/// FALSIFY-VE-006: Scaling by -1 twice is the identity
#[test]
fn falsify_ve_006_negation_involution() {
    let v = Vector::from_slice(&[0.25, -7.0, 2.0]);
    let back = v.scale(-1.0).scale(-1.0);

    for i in 0..v.len() {
        assert!(
            (back[i] - v[i]).abs() < 1e-6,
            "FALSIFIED VE-006: double negation changed element {i}"
        );
    }
}
