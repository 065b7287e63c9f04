//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use aislar::prelude::*;
//! ```

pub use crate::damex::Damex;
pub use crate::error::{AislarError, Result};
pub use crate::forest::IsolationForest;
pub use crate::neighbors::{BruteForceNeighbors, LocalOutlierFactor, Metric};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{AnomalyDetector, NeighborSearch};
