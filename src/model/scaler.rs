//! Per-feature affine normalization.
//!
//! The scaler applies the fitted `(mean, std)` statistics elementwise:
//! `scaled[i] = (raw[i] - mean[i]) / std[i]`. Stds are guaranteed non-zero at
//! fit time, but if a degenerate zero-variance feature were ever loaded the
//! scaler substitutes `std = 1` instead of dividing by zero, keeping
//! inference total.

use crate::error::PipelineError;
use crate::features::{FEATURE_COUNT, FeatureVector};

#[derive(Debug, Clone)]
pub struct Scaler {
    means: [f64; FEATURE_COUNT],
    stds: [f64; FEATURE_COUNT],
}

impl Scaler {
    /// Build a scaler from fitted statistics.
    ///
    /// Fails with `ModelNotLoaded` if the statistics do not cover exactly the
    /// global feature order or contain non-finite values.
    pub fn new(means: &[f64], stds: &[f64]) -> Result<Self, PipelineError> {
        if means.len() != FEATURE_COUNT || stds.len() != FEATURE_COUNT {
            return Err(PipelineError::ModelNotLoaded(format!(
                "scaler statistics must have {FEATURE_COUNT} entries, got {} means / {} stds",
                means.len(),
                stds.len()
            )));
        }
        if means.iter().chain(stds.iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::ModelNotLoaded(
                "scaler statistics contain non-finite values".to_string(),
            ));
        }
        let mut m = [0.0; FEATURE_COUNT];
        let mut s = [0.0; FEATURE_COUNT];
        m.copy_from_slice(means);
        s.copy_from_slice(stds);
        Ok(Self { means: m, stds: s })
    }

    /// Normalize a feature vector.
    pub fn apply(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, v) in features.values().iter().enumerate() {
            let std = if self.stds[i] > 0.0 { self.stds[i] } else { 1.0 };
            out[i] = (v - self.means[i]) / std;
        }
        FeatureVector::from_values(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_is_elementwise_affine() {
        let means = [2.0; FEATURE_COUNT];
        let stds = [4.0; FEATURE_COUNT];
        let scaler = Scaler::new(&means, &stds).unwrap();

        let raw = FeatureVector::from_values([10.0; FEATURE_COUNT]);
        let scaled = scaler.apply(&raw);
        for v in scaled.values() {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_variance_feature_uses_unit_std() {
        let means = [0.0; FEATURE_COUNT];
        let mut stds = [1.0; FEATURE_COUNT];
        stds[3] = 0.0;
        let scaler = Scaler::new(&means, &stds).unwrap();

        let mut values = [0.0; FEATURE_COUNT];
        values[3] = 7.0;
        let scaled = scaler.apply(&FeatureVector::from_values(values));
        assert_eq!(scaled.values()[3], 7.0);
    }

    #[test]
    fn wrong_length_statistics_are_rejected() {
        let err = Scaler::new(&[0.0; 5], &[1.0; 5]).unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn non_finite_statistics_are_rejected() {
        let means = [0.0; FEATURE_COUNT];
        let mut stds = [1.0; FEATURE_COUNT];
        stds[0] = f64::NAN;
        let err = Scaler::new(&means, &stds).unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }
}
