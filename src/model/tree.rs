//! Decision-tree inference.
//!
//! Trees are stored as a flat node array with the root at index 0. To keep
//! traversal total without cycle detection, the artifact schema requires
//! every split's child indices to be strictly greater than the parent's
//! index; [`DecisionTree::validate`] enforces this (plus feature-index and
//! finiteness checks) once at load time, so evaluation can index freely.

use serde::{Deserialize, Serialize};

use crate::domain::CLASS_COUNT;

/// One node of a flat-encoded tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    /// Route left when `features[feature] <= threshold`, right otherwise.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal per-class values: probabilities/counts for forest trees,
    /// raw margin contributions for boosted trees.
    Leaf { value: [f64; CLASS_COUNT] },
}

/// A fitted decision tree (inference only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Structural validation, run once when the artifact is loaded.
    ///
    /// Checks that the tree is non-empty, every split references a valid
    /// feature and strictly-forward children, and every stored number is
    /// finite. Leaf-value semantics (distribution vs margin) are checked by
    /// the owning classifier.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= feature_count {
                        return Err(format!(
                            "node {idx}: feature index {feature} out of range (< {feature_count})"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx}: non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "node {idx}: child index {child} must be in ({idx}, {})",
                                self.nodes.len()
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(format!("node {idx}: non-finite leaf value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the tree for one feature vector and return the leaf values.
    ///
    /// Assumes [`DecisionTree::validate`] has passed (load-time invariant).
    pub fn evaluate(&self, features: &[f64]) -> [f64; CLASS_COUNT] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return *value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 2,
                    threshold: 1.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    value: [1.0, 0.0, 0.0],
                },
                TreeNode::Leaf {
                    value: [0.0, 0.0, 1.0],
                },
            ],
        }
    }

    #[test]
    fn evaluate_routes_on_threshold() {
        let tree = stump();
        let mut features = vec![0.0; 5];

        features[2] = 1.0;
        assert_eq!(tree.evaluate(&features), [1.0, 0.0, 0.0]);

        features[2] = 2.0;
        assert_eq!(tree.evaluate(&features), [0.0, 0.0, 1.0]);

        // Boundary value goes left.
        features[2] = 1.5;
        assert_eq!(tree.evaluate(&features), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn validate_accepts_well_formed_tree() {
        assert!(stump().validate(5).is_ok());
    }

    #[test]
    fn validate_rejects_feature_out_of_range() {
        let tree = stump();
        assert!(tree.validate(2).is_err());
    }

    #[test]
    fn validate_rejects_backward_child_index() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf {
                    value: [1.0, 0.0, 0.0],
                },
            ],
        };
        assert!(tree.validate(5).is_err());
    }

    #[test]
    fn validate_rejects_empty_tree() {
        let tree = DecisionTree { nodes: vec![] };
        assert!(tree.validate(5).is_err());
    }

    #[test]
    fn validate_rejects_non_finite_leaf() {
        let tree = DecisionTree {
            nodes: vec![TreeNode::Leaf {
                value: [f64::NAN, 0.0, 0.0],
            }],
        };
        assert!(tree.validate(5).is_err());
    }
}
