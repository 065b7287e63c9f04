// =========================================================================
// FALSIFY-MX: Matrix primitives contract
//
// Matrix is the exchange type every estimator consumes; these laws pin the
// row-major layout and the row/column accessors the detectors rely on.
//
// References:
//   - Golub & Van Loan (2013) "Matrix Computations"
// =========================================================================

use super::*;

/// FALSIFY-MX-001: Row-major layout: get(i, j) = data[i * cols + j]
#[test]
fn falsify_mx_001_row_major_layout() {
    let a = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let flat = a.as_slice();

    for i in 0..2 {
        for j in 0..3 {
            assert!(
                (a.get(i, j) - flat[i * 3 + j]).abs() < 1e-6,
                "FALSIFIED MX-001: get({i},{j}) != data[{}]",
                i * 3 + j
            );
        }
    }
}

/// FALSIFY-MX-002: Row and column extraction agree with element access
#[test]
fn falsify_mx_002_row_column_agree_with_get() {
    let a =
        Matrix::from_vec(3, 2, vec![1.0_f32, 10.0, 2.0, 20.0, 3.0, 30.0]).expect("valid");

    for i in 0..3 {
        let row = a.row(i);
        for j in 0..2 {
            assert!(
                (row[j] - a.get(i, j)).abs() < 1e-6,
                "FALSIFIED MX-002: row({i})[{j}] != get({i},{j})"
            );
        }
    }
    for j in 0..2 {
        let col = a.column(j);
        for i in 0..3 {
            assert!(
                (col[i] - a.get(i, j)).abs() < 1e-6,
                "FALSIFIED MX-002: column({j})[{i}] != get({i},{j})"
            );
        }
    }
}

/// FALSIFY-MX-003: from_vec rejects any data length other than rows * cols
#[test]
fn falsify_mx_003_from_vec_length_check() {
    assert!(
        Matrix::from_vec(2, 2, vec![1.0_f32; 3]).is_err(),
        "FALSIFIED MX-003: short data accepted"
    );
    assert!(
        Matrix::from_vec(2, 2, vec![1.0_f32; 5]).is_err(),
        "FALSIFIED MX-003: long data accepted"
    );
    assert!(
        Matrix::from_vec(2, 2, vec![1.0_f32; 4]).is_ok(),
        "FALSIFIED MX-003: exact data rejected"
    );
}

/// FALSIFY-MX-004: set writes exactly one cell
#[test]
fn falsify_mx_004_set_is_local() {
    let mut a = Matrix::<f32>::zeros(2, 2);
    a.set(1, 0, 7.0);

    assert!((a.get(1, 0) - 7.0).abs() < 1e-6, "FALSIFIED MX-004: write lost");
    for (i, j) in [(0, 0), (0, 1), (1, 1)] {
        assert!(
            a.get(i, j).abs() < 1e-6,
            "FALSIFIED MX-004: set(1,0) disturbed ({i},{j})"
        );
    }
}

mod matrix_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-MX-005-prop: Concatenated row slices reconstruct the storage
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        #[test]
        fn falsify_mx_005_prop_rows_reconstruct_storage(
            rows in 1..=8usize,
            cols in 1..=8usize,
            seed in 0..500u32,
        ) {
            let data: Vec<f32> = (0..rows * cols)
                .map(|i| ((i as f32 + seed as f32) * 0.37).sin() * 10.0)
                .collect();
            let a = Matrix::from_vec(rows, cols, data.clone()).expect("valid");

            let mut rebuilt = Vec::with_capacity(rows * cols);
            for i in 0..rows {
                rebuilt.extend_from_slice(a.row_slice(i));
            }
            prop_assert_eq!(
                rebuilt, data,
                "FALSIFIED MX-005-prop: row slices do not tile the storage"
            );
        }
    }

    /// FALSIFY-MX-006-prop: row() copies match row_slice() borrows
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn falsify_mx_006_prop_row_copy_matches_borrow(
            rows in 1..=6usize,
            cols in 1..=6usize,
            seed in 0..500u32,
        ) {
            let data: Vec<f32> = (0..rows * cols)
                .map(|i| ((i as f32 + seed as f32) * 0.53).cos() * 5.0)
                .collect();
            let a = Matrix::from_vec(rows, cols, data).expect("valid");

            for i in 0..rows {
                let row = a.row(i);
                prop_assert_eq!(
                    row.as_slice(), a.row_slice(i),
                    "FALSIFIED MX-006-prop: row({}) copy differs from borrow", i
                );
            }
        }
    }
}
