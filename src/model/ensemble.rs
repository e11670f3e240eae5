//! Two-classifier ensemble: weighted fusion, tie-break, explanations.
//!
//! Both classifiers score the same scaled feature vector independently; their
//! distributions are fused with fixed weights and renormalized to absorb
//! floating-point drift. The predicted class is the argmax with a documented
//! deterministic tie-break (CONFIRMED > CANDIDATE > FALSE POSITIVE within
//! epsilon of the maximum). Feature importances are fused with the same
//! weights, normalized to sum to 1, and reported top-K.

use crate::domain::{CLASS_COUNT, ClassLabel, FeatureWeight};
use crate::error::PipelineError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use crate::model::artifact::ModelArtifact;
use crate::model::classifier::{BoostedClassifier, Classifier, ForestClassifier};
use crate::model::scaler::Scaler;

/// Fixed fusion weight of the forest classifier.
pub const FOREST_WEIGHT: f64 = 0.6;
/// Fixed fusion weight of the boosted classifier.
pub const BOOSTED_WEIGHT: f64 = 0.4;

/// Fixed epsilon for tie detection, kept small and documented so
/// cross-platform floating-point behavior stays reproducible.
pub const TIE_EPSILON: f64 = 1e-9;

/// Default number of reported importance entries.
pub const DEFAULT_TOP_K: usize = 5;

/// Output of one ensemble evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutput {
    pub label: ClassLabel,
    /// Combined probability at the predicted class.
    pub confidence: f64,
    /// Combined distribution indexed by [`ClassLabel::index`].
    pub probabilities: [f64; CLASS_COUNT],
    /// Top-K fused importances, descending weight, ties by feature order.
    pub importance: Vec<FeatureWeight>,
}

/// The fused predictor: scaler + both classifiers, read-only after startup.
#[derive(Debug, Clone)]
pub struct EnsemblePredictor {
    scaler: Scaler,
    forest: ForestClassifier,
    booster: BoostedClassifier,
    top_k: usize,
}

impl EnsemblePredictor {
    /// Build the predictor from a loaded artifact.
    ///
    /// All parameter validation happens here, before any request is served;
    /// a failure is fatal (`ModelNotLoaded`), never deferred to request time.
    pub fn from_artifact(artifact: &ModelArtifact) -> Result<Self, PipelineError> {
        artifact.check_feature_contract()?;
        let scaler = Scaler::new(&artifact.scaler.means, &artifact.scaler.stds)?;
        let forest =
            ForestClassifier::new(artifact.forest.trees.clone(), &artifact.forest.importances)?;
        let booster = BoostedClassifier::new(
            artifact.booster.trees.clone(),
            artifact.booster.base_margin,
            artifact.booster.learning_rate,
            &artifact.booster.importances,
        )?;
        Ok(Self {
            scaler,
            forest,
            booster,
            top_k: DEFAULT_TOP_K,
        })
    }

    /// Override how many importance entries are reported.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Score one raw (unscaled) feature vector.
    ///
    /// The vector's length is fixed by its type; non-finite entries surface a
    /// `PredictionInput` error rather than being silently coerced.
    pub fn predict(&self, features: &FeatureVector) -> Result<EnsembleOutput, PipelineError> {
        if let Some(i) = features.values().iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::PredictionInput(format!(
                "feature '{}' is not finite",
                FEATURE_NAMES[i]
            )));
        }

        let scaled = self.scaler.apply(features);
        let p_forest = self.forest.predict_probabilities(&scaled);
        let p_boosted = self.booster.predict_probabilities(&scaled);

        let mut combined = [0.0; CLASS_COUNT];
        for c in 0..CLASS_COUNT {
            combined[c] = FOREST_WEIGHT * p_forest[c] + BOOSTED_WEIGHT * p_boosted[c];
        }
        // Renormalize to absorb floating-point drift from the fusion.
        let sum: f64 = combined.iter().sum();
        for p in &mut combined {
            *p /= sum;
        }

        let label = argmax_with_tie_break(&combined);
        let confidence = combined[label.index()];
        let importance = self.combined_importance();

        Ok(EnsembleOutput {
            label,
            confidence,
            probabilities: combined,
            importance,
        })
    }

    /// Fuse, normalize, and rank the per-feature importances.
    fn combined_importance(&self) -> Vec<FeatureWeight> {
        let rf = self.forest.feature_importances();
        let gb = self.booster.feature_importances();

        let mut combined = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            combined[i] = FOREST_WEIGHT * rf[i] + BOOSTED_WEIGHT * gb[i];
        }
        let total: f64 = combined.iter().sum();
        if total > 0.0 {
            for w in &mut combined {
                *w /= total;
            }
        } else {
            // Degenerate all-zero importances: report a uniform ranking
            // rather than NaNs.
            combined = [1.0 / FEATURE_COUNT as f64; FEATURE_COUNT];
        }

        // Descending weight; equal weights keep original feature order.
        let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
        order.sort_by(|&a, &b| {
            combined[b]
                .partial_cmp(&combined[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        order
            .into_iter()
            .take(self.top_k)
            .map(|i| FeatureWeight {
                feature: FEATURE_NAMES[i].to_string(),
                weight: combined[i],
            })
            .collect()
    }
}

/// Argmax with the documented deterministic tie-break: among classes within
/// [`TIE_EPSILON`] of the maximum, the highest-priority class wins.
fn argmax_with_tie_break(p: &[f64; CLASS_COUNT]) -> ClassLabel {
    let max = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut best: Option<ClassLabel> = None;
    for c in 0..CLASS_COUNT {
        if p[c] >= max - TIE_EPSILON {
            let label = ClassLabel::from_index(c);
            best = match best {
                Some(prev) if prev.priority() >= label.priority() => Some(prev),
                _ => Some(label),
            };
        }
    }
    // CLASS_COUNT > 0, so at least one class is within epsilon of the max.
    best.unwrap_or(ClassLabel::FalsePositive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> EnsemblePredictor {
        EnsemblePredictor::from_artifact(&ModelArtifact::demonstration()).unwrap()
    }

    fn weak_signal_features() -> FeatureVector {
        // Zero raw values scale to negative score/SNR axes in the demonstration
        // artifact, so this reads as a weak, unflagged signal.
        FeatureVector::from_values([0.0; FEATURE_COUNT])
    }

    #[test]
    fn probabilities_sum_to_one_and_confidence_is_max() {
        let out = predictor().predict(&weak_signal_features()).unwrap();
        let sum: f64 = out.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);

        let max = out
            .probabilities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(out.confidence, max);
        assert_eq!(out.confidence, out.probabilities[out.label.index()]);
    }

    #[test]
    fn importance_weights_sum_to_one_and_are_ranked() {
        let predictor = predictor().with_top_k(FEATURE_COUNT);
        let out = predictor.predict(&weak_signal_features()).unwrap();

        assert_eq!(out.importance.len(), FEATURE_COUNT);
        let sum: f64 = out.importance.iter().map(|fw| fw.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(out.importance.iter().all(|fw| fw.weight >= 0.0));
        for pair in out.importance.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn top_k_defaults_to_five() {
        let out = predictor().predict(&weak_signal_features()).unwrap();
        assert_eq!(out.importance.len(), DEFAULT_TOP_K);
        // koi_score carries the largest fused weight in the demonstration
        // artifact.
        assert_eq!(out.importance[0].feature, "koi_score");
    }

    #[test]
    fn prediction_is_deterministic() {
        let p = predictor();
        let features = weak_signal_features();
        let a = p.predict(&features).unwrap();
        let b = p.predict(&features).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_feature_is_a_prediction_input_error() {
        let mut values = [0.0; FEATURE_COUNT];
        values[4] = f64::NAN;
        let err = predictor()
            .predict(&FeatureVector::from_values(values))
            .unwrap_err();
        assert!(matches!(err, PipelineError::PredictionInput(_)));
    }

    #[test]
    fn exact_tie_prefers_confirmed() {
        let third = 1.0 / 3.0;
        assert_eq!(
            argmax_with_tie_break(&[third, third, third]),
            ClassLabel::Confirmed
        );
    }

    #[test]
    fn near_tie_within_epsilon_prefers_higher_priority() {
        // FALSE POSITIVE leads by less than epsilon over CANDIDATE.
        let p = [0.4 + 1e-12, 0.4, 0.2 - 1e-12];
        assert_eq!(argmax_with_tie_break(&p), ClassLabel::Candidate);
    }

    #[test]
    fn clear_maximum_wins_regardless_of_priority() {
        assert_eq!(
            argmax_with_tie_break(&[0.7, 0.2, 0.1]),
            ClassLabel::FalsePositive
        );
    }
}
