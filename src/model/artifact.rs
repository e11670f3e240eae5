//! Read/write model artifact JSON files.
//!
//! The artifact is the portable representation of everything the pipeline
//! needs to serve predictions:
//!
//! - the feature-name list the parameters were fitted against
//! - scaler statistics (per-feature mean/std)
//! - the forest classifier's trees and importances
//! - the boosted classifier's trees, base margin, learning rate, importances
//!
//! It is produced by an offline training process, loaded once at startup, and
//! never mutated in-process. Any inconsistency (wrong feature order, missing
//! classifier, malformed tree) is a `ModelNotLoaded` error: the process must
//! not begin serving with a partial model.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::CLASS_COUNT;
use crate::error::PipelineError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
use crate::model::tree::{DecisionTree, TreeNode};

/// Fitted per-feature normalization statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerStats {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

/// Fitted parameters of the forest classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub trees: Vec<DecisionTree>,
    pub importances: Vec<f64>,
}

/// Fitted parameters of the boosted classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedParams {
    pub trees: Vec<DecisionTree>,
    pub base_margin: [f64; CLASS_COUNT],
    pub learning_rate: f64,
    pub importances: Vec<f64>,
}

/// The complete serialized model, as written by the training side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Schema marker for forward compatibility.
    pub format_version: u32,
    /// Feature order the parameters were fitted against; must match
    /// [`FEATURE_NAMES`] exactly.
    pub feature_names: Vec<String>,
    pub scaler: ScalerStats,
    pub forest: ForestParams,
    pub booster: BoostedParams,
}

/// Current artifact schema version.
pub const FORMAT_VERSION: u32 = 1;

impl ModelArtifact {
    /// Cross-check the artifact's feature ordering against this build.
    ///
    /// Deep parameter validation (tree structure, importance ranges) happens
    /// when the classifiers are constructed; this catches the contract-level
    /// mismatches early with a clear message.
    pub fn check_feature_contract(&self) -> Result<(), PipelineError> {
        if self.format_version != FORMAT_VERSION {
            return Err(PipelineError::ModelNotLoaded(format!(
                "unsupported artifact format version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(PipelineError::ModelNotLoaded(format!(
                "artifact lists {} features, this build expects {FEATURE_COUNT}",
                self.feature_names.len()
            )));
        }
        for (i, (got, want)) in self.feature_names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
            if got != want {
                return Err(PipelineError::ModelNotLoaded(format!(
                    "feature order mismatch at index {i}: artifact has '{got}', expected '{want}'"
                )));
            }
        }
        Ok(())
    }

    /// Read an artifact JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| {
            PipelineError::ModelNotLoaded(format!(
                "failed to open model artifact '{}': {e}",
                path.display()
            ))
        })?;
        let artifact: ModelArtifact = serde_json::from_reader(file).map_err(|e| {
            PipelineError::ModelNotLoaded(format!("invalid model artifact JSON: {e}"))
        })?;
        artifact.check_feature_contract()?;
        Ok(artifact)
    }

    /// Write an artifact JSON file.
    pub fn to_json_file(&self, path: &Path) -> Result<(), PipelineError> {
        let file = File::create(path).map_err(|e| {
            PipelineError::Io(format!(
                "failed to create model artifact '{}': {e}",
                path.display()
            ))
        })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| PipelineError::Io(format!("failed to write model artifact: {e}")))?;
        Ok(())
    }

    /// A small handcrafted artifact so the tool runs end-to-end without the
    /// offline training process.
    ///
    /// The trees encode coarse vetting heuristics (disposition score,
    /// false-positive flags, SNR, depth) purely for demonstration; the
    /// parameters are not fitted to any survey catalog.
    pub fn demonstration() -> Self {
        // Feature indices into the global order.
        const IDX_DEPTH: usize = 1;
        const IDX_SNR: usize = 4;
        const IDX_FPFLAG_NT: usize = 11;
        const IDX_FPFLAG_SS: usize = 12;
        const IDX_SCORE: usize = 15;
        const IDX_DURATION_RATIO: usize = 16;

        // Means/stds chosen to roughly center typical catalog values; the
        // demonstration trees split on the scaled axes.
        let mut means = vec![0.0; FEATURE_COUNT];
        let mut stds = vec![1.0; FEATURE_COUNT];
        means[IDX_DEPTH] = 1000.0;
        stds[IDX_DEPTH] = 2000.0;
        means[IDX_SNR] = 20.0;
        stds[IDX_SNR] = 15.0;
        means[IDX_SCORE] = 0.5;
        stds[IDX_SCORE] = 0.3;
        means[IDX_DURATION_RATIO] = 0.02;
        stds[IDX_DURATION_RATIO] = 0.02;

        let split = |feature, threshold, left, right| TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        };
        let leaf = |value| TreeNode::Leaf { value };

        let forest_trees = vec![
            // Disposition score dominates; a flagged non-transit signal is a
            // near-certain false positive.
            DecisionTree {
                nodes: vec![
                    split(IDX_FPFLAG_NT, 0.5, 1, 4),
                    split(IDX_SCORE, 0.0, 2, 3),
                    leaf([0.55, 0.35, 0.10]),
                    leaf([0.10, 0.30, 0.60]),
                    leaf([0.85, 0.10, 0.05]),
                ],
            },
            // Strong detections separate from marginal ones.
            DecisionTree {
                nodes: vec![
                    split(IDX_SNR, -0.5, 1, 2),
                    leaf([0.50, 0.40, 0.10]),
                    split(IDX_SCORE, 0.5, 3, 4),
                    leaf([0.25, 0.45, 0.30]),
                    leaf([0.08, 0.27, 0.65]),
                ],
            },
            // Eclipsing-binary flag vs depth.
            DecisionTree {
                nodes: vec![
                    split(IDX_FPFLAG_SS, 0.5, 1, 4),
                    split(IDX_DEPTH, 1.0, 2, 3),
                    leaf([0.20, 0.45, 0.35]),
                    leaf([0.45, 0.35, 0.20]),
                    leaf([0.80, 0.15, 0.05]),
                ],
            },
        ];

        let booster_trees = vec![
            DecisionTree {
                nodes: vec![
                    split(IDX_SCORE, 0.0, 1, 2),
                    leaf([0.8, 0.1, -0.9]),
                    leaf([-0.7, 0.2, 0.5]),
                ],
            },
            DecisionTree {
                nodes: vec![
                    split(IDX_SNR, 0.0, 1, 2),
                    leaf([0.4, 0.1, -0.5]),
                    leaf([-0.3, 0.0, 0.3]),
                ],
            },
            DecisionTree {
                nodes: vec![
                    split(IDX_DURATION_RATIO, 1.5, 1, 2),
                    leaf([0.0, 0.1, 0.0]),
                    leaf([0.6, -0.1, -0.5]),
                ],
            },
        ];

        let mut forest_importances = vec![0.01; FEATURE_COUNT];
        forest_importances[IDX_SCORE] = 0.30;
        forest_importances[IDX_FPFLAG_NT] = 0.15;
        forest_importances[IDX_FPFLAG_SS] = 0.10;
        forest_importances[IDX_SNR] = 0.12;
        forest_importances[IDX_DEPTH] = 0.08;

        let mut booster_importances = vec![0.01; FEATURE_COUNT];
        booster_importances[IDX_SCORE] = 0.25;
        booster_importances[IDX_SNR] = 0.20;
        booster_importances[IDX_DURATION_RATIO] = 0.12;
        booster_importances[IDX_DEPTH] = 0.06;

        Self {
            format_version: FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            scaler: ScalerStats { means, stds },
            forest: ForestParams {
                trees: forest_trees,
                importances: forest_importances,
            },
            booster: BoostedParams {
                trees: booster_trees,
                base_margin: [0.0; CLASS_COUNT],
                learning_rate: 0.5,
                importances: booster_importances,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demonstration_artifact_satisfies_the_feature_contract() {
        let artifact = ModelArtifact::demonstration();
        artifact.check_feature_contract().unwrap();
    }

    #[test]
    fn feature_order_mismatch_is_rejected() {
        let mut artifact = ModelArtifact::demonstration();
        artifact.feature_names.swap(0, 1);
        let err = artifact.check_feature_contract().unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let mut artifact = ModelArtifact::demonstration();
        artifact.format_version = 99;
        let err = artifact.check_feature_contract().unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let dir = std::env::temp_dir();
        let path = dir.join("transit_vet_artifact_roundtrip.json");

        let artifact = ModelArtifact::demonstration();
        artifact.to_json_file(&path).unwrap();
        let loaded = ModelArtifact::from_json_file(&path).unwrap();

        assert_eq!(loaded.feature_names, artifact.feature_names);
        assert_eq!(loaded.forest.trees, artifact.forest.trees);
        assert_eq!(loaded.booster.learning_rate, artifact.booster.learning_rate);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_artifact_file_is_model_not_loaded() {
        let err =
            ModelArtifact::from_json_file(Path::new("/nonexistent/artifact.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }
}
