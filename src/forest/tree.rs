//! Randomized binary partition trees for isolation scoring.
//!
//! Each tree recursively splits a sample subset on a uniformly random
//! feature and a uniformly random threshold inside that feature's observed
//! range. No split quality criterion is evaluated; random partitioning is
//! the defining property of isolation trees.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::average_path_length;
use crate::primitives::Matrix;

/// Internal node: a random split and its two subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitNode {
    /// Index of the feature the split tests
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature < threshold)
    pub left: Box<IsoNode>,
    /// Right subtree (samples where feature >= threshold)
    pub right: Box<IsoNode>,
}

/// Leaf node: the residual population that was never separated further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode {
    /// Number of training samples that ended in this leaf
    pub n_samples: usize,
}

/// A node in an isolation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsoNode {
    /// Internal split node
    Split(SplitNode),
    /// Terminal leaf node
    Leaf(LeafNode),
}

/// A single randomized partition tree of an isolation forest.
///
/// Built over a sub-sample (and optionally a feature subset) of the
/// training data; immutable afterwards. [`IsoTree::apply`] walks a sample
/// to its leaf and returns the isolation depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsoTree {
    root: IsoNode,
}

impl IsoTree {
    /// Builds a tree over the rows named by `sample_indices`, splitting
    /// only on the features in `features`, to at most `max_depth` levels.
    pub(crate) fn build(
        x: &Matrix<f32>,
        sample_indices: &[usize],
        features: &[usize],
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Self {
        let root = build_node(x, sample_indices.to_vec(), features, max_depth, 0, rng);
        Self { root }
    }

    /// Isolation depth of one sample: the number of edges from the root to
    /// the sample's leaf, plus the expected path length of an unsuccessful
    /// search among the leaf's residual population.
    #[must_use]
    pub fn apply(&self, sample: &[f32]) -> f32 {
        let mut node = &self.root;
        let mut depth = 0.0_f32;
        loop {
            match node {
                IsoNode::Leaf(leaf) => {
                    return depth + average_path_length(leaf.n_samples);
                }
                IsoNode::Split(split) => {
                    node = if sample[split.feature_idx] < split.threshold {
                        &split.left
                    } else {
                        &split.right
                    };
                    depth += 1.0;
                }
            }
        }
    }

    /// Number of leaves, for diagnostics.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        fn count(node: &IsoNode) -> usize {
            match node {
                IsoNode::Leaf(_) => 1,
                IsoNode::Split(split) => count(&split.left) + count(&split.right),
            }
        }
        count(&self.root)
    }
}

/// Recursive construction of one subtree over `indices`.
///
/// A branch terminates as a leaf once it holds at most one sample, the
/// depth cap is reached, the drawn feature has a degenerate value range, or
/// the drawn threshold fails to separate the samples.
fn build_node(
    x: &Matrix<f32>,
    indices: Vec<usize>,
    features: &[usize],
    max_depth: usize,
    depth: usize,
    rng: &mut StdRng,
) -> IsoNode {
    if indices.len() <= 1 || depth >= max_depth {
        return IsoNode::Leaf(LeafNode {
            n_samples: indices.len(),
        });
    }

    let feature_idx = features[rng.gen_range(0..features.len())];

    let mut min_val = f32::INFINITY;
    let mut max_val = f32::NEG_INFINITY;
    for &i in &indices {
        let v = x.get(i, feature_idx);
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }

    // Degenerate value range: nothing left to separate on this feature.
    if (max_val - min_val).abs() < 1e-10 {
        return IsoNode::Leaf(LeafNode {
            n_samples: indices.len(),
        });
    }

    let threshold = Uniform::from(min_val..max_val).sample(rng);

    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for &i in &indices {
        if x.get(i, feature_idx) < threshold {
            left_indices.push(i);
        } else {
            right_indices.push(i);
        }
    }

    // A threshold at the range boundary can leave one side empty; the
    // partition is then trivial and the branch terminates.
    if left_indices.is_empty() || right_indices.is_empty() {
        return IsoNode::Leaf(LeafNode {
            n_samples: indices.len(),
        });
    }

    IsoNode::Split(SplitNode {
        feature_idx,
        threshold,
        left: Box::new(build_node(
            x,
            left_indices,
            features,
            max_depth,
            depth + 1,
            rng,
        )),
        right: Box::new(build_node(
            x,
            right_indices,
            features,
            max_depth,
            depth + 1,
            rng,
        )),
    })
}
