//! The two concrete classifiers and the capability trait they share.
//!
//! The ensemble is polymorphic over exactly two capabilities: producing a
//! 3-class probability distribution for a scaled feature vector, and exposing
//! per-feature importance scores. Both concrete variants are tree ensembles,
//! but they turn leaf values into probabilities differently:
//!
//! - [`ForestClassifier`]: each tree's leaf is a class distribution; the
//!   forest averages the per-tree distributions (bagging-style)
//! - [`BoostedClassifier`]: each tree's leaf is a per-class margin
//!   contribution; margins are accumulated additively and mapped through a
//!   softmax (boosting-style)

use crate::domain::CLASS_COUNT;
use crate::error::PipelineError;
use crate::features::{FEATURE_COUNT, FeatureVector};
use crate::model::tree::{DecisionTree, TreeNode};

/// Capability set required by the ensemble.
pub trait Classifier {
    /// Class probabilities for one scaled feature vector.
    ///
    /// The returned distribution is non-negative and sums to 1.
    fn predict_probabilities(&self, features: &FeatureVector) -> [f64; CLASS_COUNT];

    /// Per-feature importance scores (non-negative, arbitrary relative scale),
    /// one per entry of the global feature order.
    fn feature_importances(&self) -> &[f64; FEATURE_COUNT];
}

fn validate_importances(importances: &[f64], what: &str) -> Result<[f64; FEATURE_COUNT], PipelineError> {
    if importances.len() != FEATURE_COUNT {
        return Err(PipelineError::ModelNotLoaded(format!(
            "{what}: expected {FEATURE_COUNT} feature importances, got {}",
            importances.len()
        )));
    }
    if importances.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(PipelineError::ModelNotLoaded(format!(
            "{what}: importances must be finite and non-negative"
        )));
    }
    let mut out = [0.0; FEATURE_COUNT];
    out.copy_from_slice(importances);
    Ok(out)
}

/// Bagged tree classifier: averages per-tree leaf distributions.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    importances: [f64; FEATURE_COUNT],
}

impl ForestClassifier {
    /// Validate and adopt fitted forest parameters.
    ///
    /// Every leaf must hold a usable class distribution (non-negative values
    /// with a positive sum); anything else means the artifact does not match
    /// this inference code and is rejected up front.
    pub fn new(trees: Vec<DecisionTree>, importances: &[f64]) -> Result<Self, PipelineError> {
        if trees.is_empty() {
            return Err(PipelineError::ModelNotLoaded(
                "forest classifier has no trees".to_string(),
            ));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(FEATURE_COUNT).map_err(|e| {
                PipelineError::ModelNotLoaded(format!("forest tree {i}: {e}"))
            })?;
            for node in &tree.nodes {
                if let TreeNode::Leaf { value } = node {
                    let sum: f64 = value.iter().sum();
                    if value.iter().any(|v| *v < 0.0) || sum <= 0.0 {
                        return Err(PipelineError::ModelNotLoaded(format!(
                            "forest tree {i}: leaf is not a class distribution"
                        )));
                    }
                }
            }
        }
        let importances = validate_importances(importances, "forest classifier")?;
        Ok(Self { trees, importances })
    }
}

impl Classifier for ForestClassifier {
    fn predict_probabilities(&self, features: &FeatureVector) -> [f64; CLASS_COUNT] {
        let mut acc = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            let leaf = tree.evaluate(features.values());
            // Leaves may store raw class counts; normalize per tree so every
            // tree votes with equal weight.
            let sum: f64 = leaf.iter().sum();
            for (a, v) in acc.iter_mut().zip(leaf.iter()) {
                *a += v / sum;
            }
        }
        let n = self.trees.len() as f64;
        acc.map(|v| v / n)
    }

    fn feature_importances(&self) -> &[f64; FEATURE_COUNT] {
        &self.importances
    }
}

/// Boosted tree classifier: accumulates per-class margins, then softmax.
#[derive(Debug, Clone)]
pub struct BoostedClassifier {
    trees: Vec<DecisionTree>,
    base_margin: [f64; CLASS_COUNT],
    learning_rate: f64,
    importances: [f64; FEATURE_COUNT],
}

impl BoostedClassifier {
    pub fn new(
        trees: Vec<DecisionTree>,
        base_margin: [f64; CLASS_COUNT],
        learning_rate: f64,
        importances: &[f64],
    ) -> Result<Self, PipelineError> {
        if trees.is_empty() {
            return Err(PipelineError::ModelNotLoaded(
                "boosted classifier has no trees".to_string(),
            ));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(FEATURE_COUNT).map_err(|e| {
                PipelineError::ModelNotLoaded(format!("boosted tree {i}: {e}"))
            })?;
        }
        if base_margin.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::ModelNotLoaded(
                "boosted classifier base margin is not finite".to_string(),
            ));
        }
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(PipelineError::ModelNotLoaded(format!(
                "boosted classifier learning rate must be positive, got {learning_rate}"
            )));
        }
        let importances = validate_importances(importances, "boosted classifier")?;
        Ok(Self {
            trees,
            base_margin,
            learning_rate,
            importances,
        })
    }
}

impl Classifier for BoostedClassifier {
    fn predict_probabilities(&self, features: &FeatureVector) -> [f64; CLASS_COUNT] {
        let mut margin = self.base_margin;
        for tree in &self.trees {
            let leaf = tree.evaluate(features.values());
            for (m, v) in margin.iter_mut().zip(leaf.iter()) {
                *m += self.learning_rate * v;
            }
        }
        softmax(&margin)
    }

    fn feature_importances(&self) -> &[f64; FEATURE_COUNT] {
        &self.importances
    }
}

/// Numerically stable softmax over the class margins.
fn softmax(margin: &[f64; CLASS_COUNT]) -> [f64; CLASS_COUNT] {
    let max = margin.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp = margin.map(|m| (m - max).exp());
    let sum: f64 = exp.iter().sum();
    exp.map(|e| e / sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_importances() -> Vec<f64> {
        vec![1.0; FEATURE_COUNT]
    }

    fn leaf_tree(value: [f64; CLASS_COUNT]) -> DecisionTree {
        DecisionTree {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    fn zero_features() -> FeatureVector {
        FeatureVector::from_values([0.0; FEATURE_COUNT])
    }

    #[test]
    fn forest_averages_normalized_leaves() {
        let forest = ForestClassifier::new(
            vec![
                // Raw counts: normalizes to [0.5, 0.25, 0.25].
                leaf_tree([2.0, 1.0, 1.0]),
                leaf_tree([0.0, 1.0, 0.0]),
            ],
            &uniform_importances(),
        )
        .unwrap();

        let p = forest.predict_probabilities(&zero_features());
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.625).abs() < 1e-12);
        assert!((p[2] - 0.125).abs() < 1e-12);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn forest_rejects_negative_leaf() {
        let err = ForestClassifier::new(
            vec![leaf_tree([-1.0, 1.0, 1.0])],
            &uniform_importances(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn boosted_probabilities_sum_to_one() {
        let booster = BoostedClassifier::new(
            vec![leaf_tree([0.5, -0.2, 1.0]), leaf_tree([-0.1, 0.3, 0.4])],
            [0.0; CLASS_COUNT],
            0.3,
            &uniform_importances(),
        )
        .unwrap();

        let p = booster.predict_probabilities(&zero_features());
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p.iter().all(|v| *v > 0.0));
        // Class 2 accumulated the largest margin.
        assert!(p[2] > p[0] && p[2] > p[1]);
    }

    #[test]
    fn boosted_rejects_non_positive_learning_rate() {
        let err = BoostedClassifier::new(
            vec![leaf_tree([0.0; CLASS_COUNT])],
            [0.0; CLASS_COUNT],
            0.0,
            &uniform_importances(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn importances_of_wrong_length_are_rejected() {
        let err = ForestClassifier::new(vec![leaf_tree([1.0, 1.0, 1.0])], &[1.0; 3]).unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn softmax_handles_large_margins() {
        let p = softmax(&[1000.0, 0.0, -1000.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[0] > 0.99);
    }
}
