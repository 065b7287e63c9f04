//! Aislar: unsupervised anomaly detection in pure Rust.
//!
//! Aislar ships three detectors behind one small estimator API: an
//! Isolation Forest (randomized partition-tree ensemble), DAMEX (an
//! extreme-value angular-measure estimator for multivariate tails), and a
//! Local Outlier Factor (k-nearest-neighbor density ratio).
//!
//! # Quick Start
//!
//! ```
//! use aislar::prelude::*;
//!
//! // A tight cluster and one isolated point.
//! let data = Matrix::from_vec(6, 2, vec![
//!     0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 0.1, 0.2, 0.0, 0.1,
//!     9.0, 9.0,
//! ]).unwrap();
//!
//! let mut forest = IsolationForest::new()
//!     .with_n_estimators(50)
//!     .with_random_state(42);
//! forest.fit(&data).unwrap();
//!
//! let scores = forest.predict(&data).unwrap();
//! // Scores live in (0, 1]; the isolated point stands out.
//! assert!(scores[5] > scores[0]);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: dense [`Matrix`]/[`Vector`] and sparse CSC/CSR types
//! - [`forest`]: Isolation Forest ensemble scoring
//! - [`damex`]: DAMEX extreme-region angular-measure estimation
//! - [`neighbors`]: Local Outlier Factor and exact k-NN search
//! - [`metrics`]: ranking metrics (ROC AUC, precision-recall) for
//!   validating detector output
//! - [`traits`]: the [`AnomalyDetector`] and `NeighborSearch` contracts
//! - [`validation`]: shared fail-fast input checks
//!
//! Every detector follows the same lifecycle: configure through builder
//! methods, `fit` once, then call `predict`/`decision_function` any number
//! of times. Fitted state is immutable between fits and malformed input is
//! rejected before any state changes.

pub mod damex;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod neighbors;
pub mod prelude;
pub mod primitives;
pub mod traits;
pub mod validation;

pub use error::{AislarError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{AnomalyDetector, NeighborSearch};
