//! Pipeline error kinds.
//!
//! Each variant corresponds to one failure surface of the pipeline:
//!
//! - `FeatureEngineering`: a structurally required raw field is missing or
//!   unusable, so no feature vector can be built for that observation
//! - `PredictionInput`: a feature vector reached the ensemble with the wrong
//!   length or a non-finite value (never silently coerced)
//! - `ModelNotLoaded`: the model artifact is absent or inconsistent; fatal at
//!   startup, the pipeline must not serve any request
//! - `LightCurveInput`: invalid waveform parameters (would produce NaNs)
//! - `Io`: file/parse failures from the CLI-facing loaders
//!
//! Validation warnings are *not* errors; they ride along on a successful
//! `PredictionResult`.

#[derive(Clone, PartialEq, Eq)]
pub enum PipelineError {
    FeatureEngineering(String),
    PredictionInput(String),
    ModelNotLoaded(String),
    LightCurveInput(String),
    Io(String),
}

impl PipelineError {
    /// Process exit code used by the `tvet` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Io(_) => 2,
            PipelineError::ModelNotLoaded(_) => 3,
            PipelineError::FeatureEngineering(_) => 4,
            PipelineError::PredictionInput(_) => 4,
            PipelineError::LightCurveInput(_) => 4,
        }
    }

    /// Short stable name for per-row batch error reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PipelineError::FeatureEngineering(_) => "feature_engineering",
            PipelineError::PredictionInput(_) => "prediction_input",
            PipelineError::ModelNotLoaded(_) => "model_not_loaded",
            PipelineError::LightCurveInput(_) => "light_curve_input",
            PipelineError::Io(_) => "io",
        }
    }

    fn message(&self) -> &str {
        match self {
            PipelineError::FeatureEngineering(m)
            | PipelineError::PredictionInput(m)
            | PipelineError::ModelNotLoaded(m)
            | PipelineError::LightCurveInput(m)
            | PipelineError::Io(m) => m,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind_name(), self.message())
    }
}

impl std::fmt::Debug for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineError")
            .field("kind", &self.kind_name())
            .field("message", &self.message())
            .finish()
    }
}

impl std::error::Error for PipelineError {}
