//! Feature engineering: raw observation -> fixed-length feature vector.
//!
//! The feature order below is a versioned contract shared by the scaler and
//! both classifiers. Any change here invalidates every serialized model
//! artifact, so the artifact loader cross-checks its stored name list against
//! [`FEATURE_NAMES`] at load time.
//!
//! The derived-feature formulas are deliberately the exact definitions the
//! classifiers were fitted against. They are informal proxies, not
//! authoritative physics; do not "correct" them.

use crate::domain::RawObservation;
use crate::error::PipelineError;

/// Number of entries in every feature vector.
pub const FEATURE_COUNT: usize = 27;

/// Global feature ordering: 16 raw columns followed by 11 derived features.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "koi_period",
    "koi_depth",
    "koi_duration",
    "koi_impact",
    "koi_model_snr",
    "koi_prad",
    "koi_teq",
    "koi_insol",
    "koi_steff",
    "koi_slogg",
    "koi_srad",
    "koi_fpflag_nt",
    "koi_fpflag_ss",
    "koi_fpflag_co",
    "koi_fpflag_ec",
    "koi_score",
    "duration_ratio",
    "depth_duration_product",
    "density_proxy",
    "snr_depth_ratio",
    "period_depth_correlation",
    "planet_temp_ratio",
    "stellar_density",
    "transit_probability",
    "equilibrium_flux",
    "impact_depth_product",
    "duration_impact_ratio",
];

/// Neutral defaults substituted for absent optional fields.
///
/// These match the values used when the classifiers were trained, so a
/// missing group degrades gracefully instead of failing the prediction.
pub mod defaults {
    pub const IMPACT: f64 = 0.5;
    pub const MODEL_SNR: f64 = 10.0;
    pub const PLANET_RADIUS: f64 = 1.0;
    pub const EQUILIBRIUM_TEMP: f64 = 288.0;
    pub const INSOLATION: f64 = 1.0;
    pub const STAR_EFFECTIVE_TEMP: f64 = 5778.0;
    pub const STAR_SURFACE_GRAVITY: f64 = 4.44;
    pub const STAR_RADIUS: f64 = 1.0;
    pub const FLAG: f64 = 0.0;
    pub const DISPOSITION_SCORE: f64 = 0.5;
}

/// Epsilon floor guarding the `density_proxy` denominator.
const DURATION_EPS: f64 = 1e-6;

/// A fixed-length ordered feature vector, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wrap a pre-ordered value array (used by tests and the artifact tools).
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Look up a value by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

/// Build the feature vector for one observation.
///
/// Required raw fields (`period`, `depth`, `duration`) must be present,
/// finite, and positive; everything else falls back to its neutral default.
pub fn engineer(obs: &RawObservation) -> Result<FeatureVector, PipelineError> {
    let period = required(obs.transit.period, "period")?;
    let depth = required(obs.transit.depth, "depth")?;
    let duration = required(obs.transit.duration, "duration")?;

    let impact = opt(obs.transit.impact, defaults::IMPACT);
    let model_snr = opt(obs.transit.model_snr, defaults::MODEL_SNR);

    let planet = obs.planet.clone().unwrap_or_default();
    let prad = opt(planet.radius, defaults::PLANET_RADIUS);
    let teq = opt(planet.equilibrium_temp, defaults::EQUILIBRIUM_TEMP);
    let insol = opt(planet.insolation, defaults::INSOLATION);

    let star = obs.star.clone().unwrap_or_default();
    let steff = opt(star.effective_temp, defaults::STAR_EFFECTIVE_TEMP);
    let slogg = opt(star.surface_gravity, defaults::STAR_SURFACE_GRAVITY);
    let srad = opt(star.radius, defaults::STAR_RADIUS);

    let flags = obs.flags.clone().unwrap_or_default();
    let fp_nt = opt(flags.not_transit_like, defaults::FLAG);
    let fp_ss = opt(flags.stellar_eclipse, defaults::FLAG);
    let fp_co = opt(flags.centroid_offset, defaults::FLAG);
    let fp_ec = opt(flags.ephemeris_match, defaults::FLAG);
    let score = opt(flags.disposition_score, defaults::DISPOSITION_SCORE);

    // Derived features. Denominators are floored to keep every entry finite;
    // the floors match the training pipeline.
    let duration_ratio = duration / period;
    let depth_duration_product = depth * duration;
    let density_proxy = depth / duration.max(DURATION_EPS).powi(2);
    let snr_depth_ratio = model_snr / depth.max(1.0);
    let period_depth_correlation = period.ln_1p() * depth.ln_1p();
    let planet_temp_ratio = teq / steff.max(1000.0);
    let stellar_density = 10f64.powf(slogg) / srad.max(0.1).powi(2);
    let transit_probability = (srad / period.powf(2.0 / 3.0).max(0.1)).min(1.0);
    let equilibrium_flux = insol * (steff / 5778.0).powi(4);
    let impact_depth_product = impact * depth.sqrt();
    let duration_impact_ratio = duration / impact.max(0.01);

    let values = [
        period,
        depth,
        duration,
        impact,
        model_snr,
        prad,
        teq,
        insol,
        steff,
        slogg,
        srad,
        fp_nt,
        fp_ss,
        fp_co,
        fp_ec,
        score,
        duration_ratio,
        depth_duration_product,
        density_proxy,
        snr_depth_ratio,
        period_depth_correlation,
        planet_temp_ratio,
        stellar_density,
        transit_probability,
        equilibrium_flux,
        impact_depth_product,
        duration_impact_ratio,
    ];

    Ok(FeatureVector { values })
}

fn required(value: Option<f64>, name: &str) -> Result<f64, PipelineError> {
    let Some(v) = value else {
        return Err(PipelineError::FeatureEngineering(format!(
            "missing required transit field '{name}'"
        )));
    };
    if !v.is_finite() {
        return Err(PipelineError::FeatureEngineering(format!(
            "transit field '{name}' is not a finite number: {v}"
        )));
    }
    if v <= 0.0 {
        return Err(PipelineError::FeatureEngineering(format!(
            "transit field '{name}' must be positive, got {v}"
        )));
    }
    Ok(v)
}

/// Resolve an optional field, treating non-finite stored values as absent.
fn opt(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlanetParams, StarParams, TransitParams, VettingFlags};

    fn minimal_obs(period: f64, depth: f64, duration: f64) -> RawObservation {
        RawObservation {
            transit: TransitParams {
                period: Some(period),
                depth: Some(depth),
                duration: Some(duration),
                impact: None,
                model_snr: None,
            },
            planet: None,
            star: None,
            flags: None,
        }
    }

    #[test]
    fn feature_names_are_unique_and_counted() {
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn engineer_produces_fixed_order_with_defaults() {
        let fv = engineer(&minimal_obs(15.5, 5000.0, 3.5)).unwrap();
        assert_eq!(fv.values().len(), FEATURE_COUNT);

        assert_eq!(fv.get("koi_period"), Some(15.5));
        assert_eq!(fv.get("koi_impact"), Some(defaults::IMPACT));
        assert_eq!(fv.get("koi_steff"), Some(defaults::STAR_EFFECTIVE_TEMP));
        assert_eq!(fv.get("koi_score"), Some(defaults::DISPOSITION_SCORE));
        assert_eq!(fv.get("koi_fpflag_nt"), Some(0.0));
    }

    #[test]
    fn derived_formulas_match_documented_definitions() {
        let mut obs = minimal_obs(10.0, 400.0, 2.0);
        obs.transit.impact = Some(0.25);
        obs.transit.model_snr = Some(20.0);
        obs.planet = Some(PlanetParams {
            radius: Some(2.0),
            equilibrium_temp: Some(500.0),
            insolation: Some(3.0),
        });
        obs.star = Some(StarParams {
            effective_temp: Some(6000.0),
            surface_gravity: Some(4.5),
            radius: Some(1.2),
        });
        obs.flags = Some(VettingFlags {
            disposition_score: Some(0.9),
            ..VettingFlags::default()
        });

        let fv = engineer(&obs).unwrap();
        let eps = 1e-12;

        assert!((fv.get("duration_ratio").unwrap() - 2.0 / 10.0).abs() < eps);
        assert!((fv.get("depth_duration_product").unwrap() - 800.0).abs() < eps);
        assert!((fv.get("density_proxy").unwrap() - 400.0 / 4.0).abs() < eps);
        assert!((fv.get("snr_depth_ratio").unwrap() - 20.0 / 400.0).abs() < eps);
        assert!(
            (fv.get("period_depth_correlation").unwrap() - 11f64.ln() * 401f64.ln()).abs() < eps
        );
        assert!((fv.get("planet_temp_ratio").unwrap() - 500.0 / 6000.0).abs() < eps);
        assert!(
            (fv.get("stellar_density").unwrap() - 10f64.powf(4.5) / (1.2f64 * 1.2)).abs() < 1e-9
        );
        assert!(
            (fv.get("transit_probability").unwrap() - (1.2 / 10f64.powf(2.0 / 3.0)).min(1.0))
                .abs()
                < eps
        );
        assert!(
            (fv.get("equilibrium_flux").unwrap() - 3.0 * (6000.0f64 / 5778.0).powi(4)).abs() < eps
        );
        assert!((fv.get("impact_depth_product").unwrap() - 0.25 * 20.0).abs() < eps);
        assert!((fv.get("duration_impact_ratio").unwrap() - 2.0 / 0.25).abs() < eps);
    }

    #[test]
    fn transit_probability_is_capped_at_one() {
        let mut obs = minimal_obs(0.5, 100.0, 1.0);
        obs.star = Some(StarParams {
            radius: Some(5.0),
            ..StarParams::default()
        });
        let fv = engineer(&obs).unwrap();
        assert_eq!(fv.get("transit_probability"), Some(1.0));
    }

    #[test]
    fn missing_required_field_fails() {
        let mut obs = minimal_obs(10.0, 100.0, 2.0);
        obs.transit.depth = None;
        let err = engineer(&obs).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureEngineering(_)));
    }

    #[test]
    fn non_positive_period_fails() {
        let err = engineer(&minimal_obs(0.0, 100.0, 2.0)).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureEngineering(_)));
    }

    #[test]
    fn non_finite_required_field_fails() {
        let err = engineer(&minimal_obs(f64::NAN, 100.0, 2.0)).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureEngineering(_)));
    }

    #[test]
    fn non_finite_optional_field_falls_back_to_default() {
        let mut obs = minimal_obs(10.0, 100.0, 2.0);
        obs.transit.impact = Some(f64::INFINITY);
        let fv = engineer(&obs).unwrap();
        assert_eq!(fv.get("koi_impact"), Some(defaults::IMPACT));
    }
}
