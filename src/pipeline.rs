//! The single-item prediction pipeline.
//!
//! One `Pipeline` owns the process-wide immutable state: the ensemble built
//! from a loaded model artifact, and the bounds table. Both are read-only
//! after construction, so one instance can be shared by reference across
//! concurrent predictions without locks.
//!
//! Control flow per observation:
//! validate (side-channel warnings) -> engineer features -> scale ->
//! ensemble -> result. The light-curve synthesizer is a sibling operation in
//! [`crate::curve`], driven by the same raw transit parameters but never by
//! the classifiers.

use crate::domain::{ClassProbabilities, PredictionResult, RawObservation};
use crate::error::PipelineError;
use crate::features;
use crate::model::{EnsemblePredictor, ModelArtifact};
use crate::validate::{self, BoundsTable};

pub struct Pipeline {
    ensemble: EnsemblePredictor,
    bounds: BoundsTable,
}

impl Pipeline {
    /// Build the pipeline from a loaded artifact and bounds table.
    ///
    /// Fails with `ModelNotLoaded` if the artifact is inconsistent; the
    /// caller must treat that as fatal and not serve any request.
    pub fn new(artifact: &ModelArtifact, bounds: BoundsTable) -> Result<Self, PipelineError> {
        let ensemble = EnsemblePredictor::from_artifact(artifact)?;
        Ok(Self { ensemble, bounds })
    }

    /// Override how many importance entries predictions report.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.ensemble = self.ensemble.with_top_k(top_k);
        self
    }

    /// Classify one observation.
    ///
    /// Bounds/physics warnings are advisory and attached to the successful
    /// result; only a structurally unusable observation is an error.
    pub fn predict(&self, obs: &RawObservation) -> Result<PredictionResult, PipelineError> {
        let warnings = validate::validate(obs, &self.bounds);
        let raw_features = features::engineer(obs)?;
        let output = self.ensemble.predict(&raw_features)?;

        Ok(PredictionResult {
            label: output.label,
            confidence: output.confidence,
            probabilities: ClassProbabilities::from_vector(&output.probabilities),
            feature_importance: output.importance,
            warnings,
        })
    }

    pub fn bounds(&self) -> &BoundsTable {
        &self.bounds
    }
}
