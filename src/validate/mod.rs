//! Input validation: bounds checks and physics consistency advisories.
//!
//! Validation is a side channel. Out-of-range or physically suspicious inputs
//! produce ordered, human-readable warning strings attached to the eventual
//! `PredictionResult`; they never stop the pipeline. Missing optional fields
//! produce no warning at all.

use serde::{Deserialize, Serialize};

use crate::domain::RawObservation;

/// Valid range for one raw field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Per-field valid ranges, read-only after construction.
///
/// Loaded once at startup (built-in defaults or a JSON override) and shared
/// by reference across concurrent predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsTable {
    entries: Vec<(String, Bounds)>,
}

impl BoundsTable {
    /// Built-in ranges covering the training data for each raw field.
    pub fn builtin() -> Self {
        let entries = [
            ("koi_period", 0.1, 1000.0),
            ("koi_depth", 0.1, 100_000.0),
            ("koi_duration", 0.1, 48.0),
            ("koi_impact", 0.0, 2.0),
            ("koi_model_snr", 1.0, 1000.0),
            ("koi_prad", 0.1, 30.0),
            ("koi_teq", 100.0, 3000.0),
            ("koi_insol", 0.0, 10_000.0),
            ("koi_steff", 2500.0, 10_000.0),
            ("koi_slogg", 3.0, 5.5),
            ("koi_srad", 0.1, 10.0),
            ("koi_score", 0.0, 1.0),
        ]
        .into_iter()
        .map(|(name, min, max)| (name.to_string(), Bounds { min, max }))
        .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<(String, Bounds)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<Bounds> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| *b)
    }

    fn check(&self, name: &str, value: Option<f64>, warnings: &mut Vec<String>) {
        let Some(v) = value else { return };
        let Some(bounds) = self.get(name) else { return };
        if v < bounds.min || v > bounds.max {
            warnings.push(format!(
                "{name}={v} exceeds expected range [{}, {}]",
                bounds.min, bounds.max
            ));
        }
    }
}

/// SNR below this is flagged as an unreliable detection.
const SNR_RELIABLE: f64 = 7.0;

/// Transit durations above this fraction of the period are flagged.
const MAX_DURATION_FRACTION: f64 = 0.1;

/// Validate one raw observation against the bounds table.
///
/// Returns ordered advisory warnings: bounds violations first (in table
/// field order), then physics consistency advisories.
pub fn validate(obs: &RawObservation, bounds: &BoundsTable) -> Vec<String> {
    let mut warnings = Vec::new();

    let planet = obs.planet.clone().unwrap_or_default();
    let star = obs.star.clone().unwrap_or_default();
    let flags = obs.flags.clone().unwrap_or_default();

    bounds.check("koi_period", obs.transit.period, &mut warnings);
    bounds.check("koi_depth", obs.transit.depth, &mut warnings);
    bounds.check("koi_duration", obs.transit.duration, &mut warnings);
    bounds.check("koi_impact", obs.transit.impact, &mut warnings);
    bounds.check("koi_model_snr", obs.transit.model_snr, &mut warnings);
    bounds.check("koi_prad", planet.radius, &mut warnings);
    bounds.check("koi_teq", planet.equilibrium_temp, &mut warnings);
    bounds.check("koi_insol", planet.insolation, &mut warnings);
    bounds.check("koi_steff", star.effective_temp, &mut warnings);
    bounds.check("koi_slogg", star.surface_gravity, &mut warnings);
    bounds.check("koi_srad", star.radius, &mut warnings);
    bounds.check("koi_score", flags.disposition_score, &mut warnings);

    // Physics advisories. These use only fields the caller actually supplied.
    if let (Some(period), Some(duration)) = (obs.transit.period, obs.transit.duration) {
        if period > 0.0 && duration > 0.0 {
            // Duration is in hours, period in days.
            let fraction = (duration / 24.0) / period;
            if fraction > MAX_DURATION_FRACTION {
                warnings.push(format!(
                    "transit duration ({duration:.2}h) unusually long for period ({period:.2}d)"
                ));
            }
        }
    }

    if let (Some(depth), Some(prad)) = (obs.transit.depth, planet.radius) {
        if depth > 0.0 && prad > 0.0 {
            // Expected depth (ppm) from (Rp/Rs)^2, with a factor-of-2 tolerance.
            let srad = star.radius.filter(|r| *r > 0.0).unwrap_or(1.0);
            let expected = (prad / srad).powi(2) * 1e6;
            if (depth - expected).abs() > expected * 2.0 {
                warnings.push(format!(
                    "transit depth ({depth:.0}ppm) inconsistent with planet size"
                ));
            }
        }
    }

    if let Some(snr) = obs.transit.model_snr {
        if snr < SNR_RELIABLE {
            warnings.push(format!("low SNR ({snr:.1}) - detection may be unreliable"));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlanetParams, TransitParams};

    fn obs(period: f64, depth: f64, duration: f64) -> RawObservation {
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
    fn in_range_observation_yields_no_warnings() {
        let warnings = validate(&obs(15.5, 5000.0, 3.5), &BoundsTable::builtin());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn out_of_range_period_is_worded_as_documented() {
        let warnings = validate(&obs(1500.0, 5000.0, 3.5), &BoundsTable::builtin());
        assert_eq!(
            warnings,
            vec!["koi_period=1500 exceeds expected range [0.1, 1000]".to_string()]
        );
    }

    #[test]
    fn missing_optional_fields_produce_no_warning() {
        // No SNR, planet, star, or flags supplied; only the three required
        // transit fields are checked.
        let warnings = validate(&obs(10.0, 200.0, 2.0), &BoundsTable::builtin());
        assert!(warnings.is_empty());
    }

    #[test]
    fn long_duration_fraction_is_flagged() {
        // 30h transit on a 1d period is > 10% of the period.
        let warnings = validate(&obs(1.0, 200.0, 30.0), &BoundsTable::builtin());
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("unusually long for period"))
        );
    }

    #[test]
    fn depth_inconsistent_with_planet_size_is_flagged() {
        let mut o = obs(10.0, 50_000.0, 3.0);
        // Expected depth for prad=0.1, srad=1 is (0.1)^2 * 1e6 = 10_000ppm;
        // 50_000ppm is outside the factor-of-2 tolerance band.
        o.planet = Some(PlanetParams {
            radius: Some(0.1),
            ..PlanetParams::default()
        });
        let warnings = validate(&o, &BoundsTable::builtin());
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("inconsistent with planet size"))
        );
    }

    #[test]
    fn low_snr_is_flagged() {
        let mut o = obs(10.0, 200.0, 2.0);
        o.transit.model_snr = Some(5.0);
        let warnings = validate(&o, &BoundsTable::builtin());
        assert_eq!(warnings, vec!["low SNR (5.0) - detection may be unreliable"]);
    }

    #[test]
    fn validation_never_errors_on_degenerate_input() {
        // Even a zero period (which the feature engineer rejects) only warns.
        let warnings = validate(&obs(0.0, 200.0, 2.0), &BoundsTable::builtin());
        assert!(warnings.iter().any(|w| w.starts_with("koi_period=0")));
    }
}
