//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during prediction
//! - exported to JSON for downstream consumers
//! - parsed back from CSV/JSON uploads

use serde::{Deserialize, Serialize};

/// Transit-geometry parameters of a candidate signal.
///
/// `period`, `depth`, and `duration` are structurally required: every derived
/// feature ratio depends on them. `impact` and `model_snr` default to neutral
/// values when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitParams {
    /// Orbital period (days).
    pub period: Option<f64>,
    /// Transit depth (ppm).
    pub depth: Option<f64>,
    /// Transit duration (hours).
    pub duration: Option<f64>,
    /// Impact parameter (dimensionless, 0 = central transit).
    #[serde(default)]
    pub impact: Option<f64>,
    /// Model signal-to-noise ratio of the detection.
    #[serde(default)]
    pub model_snr: Option<f64>,
}

/// Planet-level parameters (all optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetParams {
    /// Planet radius (Earth radii).
    #[serde(default)]
    pub radius: Option<f64>,
    /// Equilibrium temperature (K).
    #[serde(default)]
    pub equilibrium_temp: Option<f64>,
    /// Insolation flux (Earth flux).
    #[serde(default)]
    pub insolation: Option<f64>,
}

/// Host-star parameters (all optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarParams {
    /// Stellar effective temperature (K).
    #[serde(default)]
    pub effective_temp: Option<f64>,
    /// Log surface gravity (cgs).
    #[serde(default)]
    pub surface_gravity: Option<f64>,
    /// Stellar radius (solar radii).
    #[serde(default)]
    pub radius: Option<f64>,
}

/// False-positive vetting flags (0/1) plus the pipeline disposition score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VettingFlags {
    #[serde(default)]
    pub not_transit_like: Option<f64>,
    #[serde(default)]
    pub stellar_eclipse: Option<f64>,
    #[serde(default)]
    pub centroid_offset: Option<f64>,
    #[serde(default)]
    pub ephemeris_match: Option<f64>,
    /// Archive disposition score in [0, 1].
    #[serde(default)]
    pub disposition_score: Option<f64>,
}

/// A single raw observation as decoded by a transport/ingest collaborator.
///
/// Immutable once received; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub transit: TransitParams,
    #[serde(default)]
    pub planet: Option<PlanetParams>,
    #[serde(default)]
    pub star: Option<StarParams>,
    #[serde(default)]
    pub flags: Option<VettingFlags>,
}

/// The three outcome classes, in the classifiers' column order.
///
/// The discriminant order (FALSE POSITIVE=0, CANDIDATE=1, CONFIRMED=2)
/// matches the training target map and must not change independently of the
/// model artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLabel {
    #[serde(rename = "FALSE POSITIVE")]
    FalsePositive,
    #[serde(rename = "CANDIDATE")]
    Candidate,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
}

/// Number of outcome classes.
pub const CLASS_COUNT: usize = 3;

impl ClassLabel {
    /// Probability-vector index for this class.
    pub fn index(self) -> usize {
        match self {
            ClassLabel::FalsePositive => 0,
            ClassLabel::Candidate => 1,
            ClassLabel::Confirmed => 2,
        }
    }

    /// Inverse of [`ClassLabel::index`].
    ///
    /// # Panics
    /// Panics if `idx >= CLASS_COUNT`; probability vectors are fixed-length.
    pub fn from_index(idx: usize) -> ClassLabel {
        match idx {
            0 => ClassLabel::FalsePositive,
            1 => ClassLabel::Candidate,
            2 => ClassLabel::Confirmed,
            _ => panic!("class index out of range: {idx}"),
        }
    }

    /// Tie-break priority: higher wins when probabilities are within epsilon.
    ///
    /// CONFIRMED > CANDIDATE > FALSE POSITIVE, documented and deterministic.
    pub fn priority(self) -> u8 {
        match self {
            ClassLabel::Confirmed => 2,
            ClassLabel::Candidate => 1,
            ClassLabel::FalsePositive => 0,
        }
    }

    /// Human-readable label for terminal output and serialized results.
    pub fn display_name(self) -> &'static str {
        match self {
            ClassLabel::FalsePositive => "FALSE POSITIVE",
            ClassLabel::Candidate => "CANDIDATE",
            ClassLabel::Confirmed => "CONFIRMED",
        }
    }
}

/// Combined class probabilities, keyed by class name in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    #[serde(rename = "CONFIRMED")]
    pub confirmed: f64,
    #[serde(rename = "CANDIDATE")]
    pub candidate: f64,
    #[serde(rename = "FALSE POSITIVE")]
    pub false_positive: f64,
}

impl ClassProbabilities {
    /// Build from a probability vector indexed by [`ClassLabel::index`].
    pub fn from_vector(p: &[f64; CLASS_COUNT]) -> Self {
        Self {
            confirmed: p[ClassLabel::Confirmed.index()],
            candidate: p[ClassLabel::Candidate.index()],
            false_positive: p[ClassLabel::FalsePositive.index()],
        }
    }

    pub fn get(&self, label: ClassLabel) -> f64 {
        match label {
            ClassLabel::Confirmed => self.confirmed,
            ClassLabel::Candidate => self.candidate,
            ClassLabel::FalsePositive => self.false_positive,
        }
    }
}

/// One ranked explanation entry: feature name and its normalized weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// The full output of a single prediction. Created fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ClassLabel,
    /// Combined probability at the predicted class.
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    /// Top-K combined importances, descending weight, ties by feature order.
    pub feature_importance: Vec<FeatureWeight>,
    /// Advisory data-quality warnings (never fatal).
    pub warnings: Vec<String>,
}

/// One sample of a synthesized transit waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCurvePoint {
    pub time: f64,
    pub flux: f64,
}

/// Per-row outcome inside a batch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchRowOutcome {
    Ok {
        row_index: usize,
        result: PredictionResult,
    },
    /// A row-local failure: the error kind and message, never propagated
    /// past the batch orchestrator.
    Error {
        row_index: usize,
        kind: String,
        message: String,
    },
}

impl BatchRowOutcome {
    pub fn row_index(&self) -> usize {
        match self {
            BatchRowOutcome::Ok { row_index, .. } => *row_index,
            BatchRowOutcome::Error { row_index, .. } => *row_index,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BatchRowOutcome::Ok { .. })
    }
}

/// Aggregated result of a batch run, preserving input row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRowOutcome>,
    pub total_rows: usize,
    pub total_succeeded: usize,
    pub total_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_index_round_trips() {
        for label in [
            ClassLabel::FalsePositive,
            ClassLabel::Candidate,
            ClassLabel::Confirmed,
        ] {
            assert_eq!(ClassLabel::from_index(label.index()), label);
        }
    }

    #[test]
    fn confirmed_has_highest_priority() {
        assert!(ClassLabel::Confirmed.priority() > ClassLabel::Candidate.priority());
        assert!(ClassLabel::Candidate.priority() > ClassLabel::FalsePositive.priority());
    }

    #[test]
    fn probabilities_round_trip_by_label() {
        let p = ClassProbabilities::from_vector(&[0.2, 0.3, 0.5]);
        assert_eq!(p.get(ClassLabel::FalsePositive), 0.2);
        assert_eq!(p.get(ClassLabel::Candidate), 0.3);
        assert_eq!(p.get(ClassLabel::Confirmed), 0.5);
    }
}
