//! Shared input validation for detector fit and predict paths.
//!
//! Every structural check lives here so the estimators can fail fast with a
//! consistent error before touching any fitted state.

use crate::error::{AislarError, Result};
use crate::primitives::{Matrix, SparseFormat, SparseMatrix};

/// Checks that a sample matrix is non-empty and contains only finite values.
///
/// `context` names the operation for the error message.
///
/// # Errors
///
/// Returns [`AislarError::InvalidInput`] on an empty matrix or on NaN or
/// infinite entries.
pub fn check_matrix(x: &Matrix<f32>, context: &str) -> Result<()> {
    if x.n_rows() == 0 {
        return Err(AislarError::empty_input(&format!("{context}: no samples")));
    }
    if x.n_cols() == 0 {
        return Err(AislarError::empty_input(&format!("{context}: no features")));
    }
    if x.as_slice().iter().any(|v| !v.is_finite()) {
        return Err(AislarError::InvalidInput {
            message: format!("{context}: matrix contains NaN or infinite values"),
        });
    }
    Ok(())
}

/// Checks that a scoring matrix has the feature count seen at fit time.
///
/// # Errors
///
/// Returns [`AislarError::DimensionMismatch`] on mismatch.
pub fn check_feature_count(fitted: usize, actual: usize) -> Result<()> {
    if fitted != actual {
        return Err(AislarError::dimension_mismatch("n_features", fitted, actual));
    }
    Ok(())
}

/// Checks a sample-weight slice against the sample count.
///
/// Weights must match the number of samples, be finite and non-negative,
/// and carry positive total mass.
///
/// # Errors
///
/// Returns [`AislarError::InvalidInput`] on any violation.
pub fn check_sample_weight(weights: &[f32], n_samples: usize) -> Result<()> {
    if weights.len() != n_samples {
        return Err(AislarError::DimensionMismatch {
            expected: format!("sample_weight of length {n_samples}"),
            actual: format!("{}", weights.len()),
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(AislarError::InvalidInput {
            message: "sample_weight must be finite and non-negative".to_string(),
        });
    }
    if weights.iter().sum::<f32>() <= 0.0 {
        return Err(AislarError::InvalidInput {
            message: "sample_weight must have positive total mass".to_string(),
        });
    }
    Ok(())
}

/// Validates a sparse matrix against a layout whitelist and densifies it.
///
/// The accepted layouts are declared per call site (compressed column at
/// training time, compressed row at scoring time). A layout outside the
/// whitelist is an error, never a silent conversion; the caller can convert
/// explicitly through the dense constructors if needed.
///
/// # Errors
///
/// Returns [`AislarError::UnsupportedSparseLayout`] when the layout is not
/// whitelisted, plus the checks of [`check_matrix`] on the densified data.
pub fn check_sparse(
    x: &SparseMatrix,
    accepted: &[SparseFormat],
    context: &str,
) -> Result<Matrix<f32>> {
    if !accepted.contains(&x.format()) {
        let accepted_names: Vec<String> = accepted.iter().map(ToString::to_string).collect();
        return Err(AislarError::UnsupportedSparseLayout {
            found: x.format().to_string(),
            accepted: accepted_names.join(", "),
        });
    }
    let dense = x.to_dense();
    check_matrix(&dense, context)?;
    Ok(dense)
}
